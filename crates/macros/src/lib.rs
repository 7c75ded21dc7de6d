// SPDX-License-Identifier: GPL-3.0-or-later

//!
//! *Part of the wider calendar grid project*
//!
//! This crate contains the calendar grid procedural macros
//!

extern crate proc_macro;

use proc_macro::TokenStream;
use quote::quote;
use syn::parse::Parser;
use syn::punctuated::Punctuated;
use syn::{LitInt, Token};

// TODO: these are copied from the core crate (so are not synced)
const MIN_YEAR: i64 = -9999;
const MAX_YEAR: i64 = 9999;

/// Parse a comma separated list of exactly `N` integer literals, checking each
/// against its `(name, min, max)` bounds
fn parse_checked_integers<const N: usize>(
    input: TokenStream,
    bounds: [(&str, i64, i64); N],
) -> Result<[i64; N], syn::Error> {
    let literals = Punctuated::<LitInt, Token![,]>::parse_terminated.parse(input)?;
    if literals.len() != N {
        let names: Vec<&str> = bounds.iter().map(|(name, _, _)| *name).collect();
        return Err(syn::Error::new(
            proc_macro2::Span::call_site(),
            format!("Expected {N} integer literals: {}", names.join(", ")),
        ));
    }

    let mut values = [0; N];
    for (index, (lit, (name, min, max))) in literals.iter().zip(bounds).enumerate() {
        let value = lit
            .base10_parse::<i64>()
            .map_err(|_| syn::Error::new_spanned(lit, "Expected a valid i64 integer literal"))?;
        if value < min || value > max {
            return Err(syn::Error::new_spanned(
                lit,
                format!("{name} must be between {min} and {max}"),
            ));
        }
        values[index] = value;
    }
    Ok(values)
}

/// Number of days in the month (proleptic Gregorian)
fn length_of_month(year: i64, month: i64) -> i64 {
    let leap = (year % 4 == 0 && year % 100 != 0) || year % 400 == 0;
    match month {
        4 | 6 | 9 | 11 => 30,
        2 if leap => 29,
        2 => 28,
        _ => 31,
    }
}

/// Create a `YearMonth`, using `year_month!(year, month)`, with compile time
/// checking of the values.
#[proc_macro]
pub fn year_month(input: TokenStream) -> TokenStream {
    let [year, month] = match parse_checked_integers(
        input,
        [("Year", MIN_YEAR, MAX_YEAR), ("Month", 1, 12)],
    ) {
        Ok(values) => values,
        Err(error) => return error.to_compile_error().into(),
    };

    quote! {
        YearMonth::from(#year, #month).unwrap()
    }
    .into()
}

/// Create a `chrono::NaiveDate`, using `date!(year, month, day)`, with compile
/// time checking of the values (including the length of the month).
#[proc_macro]
pub fn date(input: TokenStream) -> TokenStream {
    let [year, month, day] = match parse_checked_integers(
        input,
        [("Year", MIN_YEAR, MAX_YEAR), ("Month", 1, 12), ("Day", 1, 31)],
    ) {
        Ok(values) => values,
        Err(error) => return error.to_compile_error().into(),
    };

    let last_day = length_of_month(year, month);
    if day > last_day {
        return syn::Error::new(
            proc_macro2::Span::call_site(),
            format!("Day must be between 1 and {last_day} for {year}-{month:02}"),
        )
        .to_compile_error()
        .into();
    }

    let year = year as i32;
    let month = month as u32;
    let day = day as u32;
    quote! {
        ::chrono::NaiveDate::from_ymd_opt(#year, #month, #day).unwrap()
    }
    .into()
}
