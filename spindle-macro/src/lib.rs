/*
 * Copyright (c) 2024. Govcraft
 *
 * Licensed under either of
 *   * Apache License, Version 2.0 (the "License");
 *     you may not use this file except in compliance with the License.
 *     You may obtain a copy of the License at http://www.apache.org/licenses/LICENSE-2.0
 *   * MIT license: http://opensource.org/licenses/MIT
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the applicable License for the specific language governing permissions and
 * limitations under that License.
 */
#![forbid(unsafe_code)]

//! Spindle Macro Library
//!
//! Attribute macros that remove the boilerplate around Spindle message and state types.
//!
//! # Message Macro
//!
//! [`spindle_message`] prepares a type for use as a call, cast, info or reply message:
//!
//! ```ignore
//! #[spindle_message]
//! pub enum CounterCall {
//!     Add(i64),
//!     Get,
//! }
//! ```
//!
//! # State Macro
//!
//! [`spindle_state`] prepares a type for use as the state a behavior's `init` returns:
//!
//! ```ignore
//! #[spindle_state]
//! pub struct CounterState {
//!     value: i64,
//! }
//! ```

use proc_macro::TokenStream;

use quote::quote;
use syn::{parse_macro_input, DeriveInput};

fn has_derive(input: &DeriveInput, trait_name: &str) -> bool {
    input.attrs.iter().any(|attr| {
        if !attr.path().is_ident("derive") {
            return false;
        }
        let mut found = false;
        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident(trait_name) {
                found = true;
            }
            Ok(())
        });
        found
    })
}

/// Options accepted by `#[spindle_state(...)]`.
#[derive(Default)]
struct StateConfig {
    /// Also derive `Default`.
    default: bool,
}

impl StateConfig {
    fn parse(attr: &TokenStream) -> Self {
        let mut config = Self::default();
        for part in attr.to_string().split(',') {
            if part.trim() == "default" {
                config.default = true;
            }
        }
        config
    }
}

fn derive_list(traits: Vec<proc_macro2::TokenStream>) -> proc_macro2::TokenStream {
    if traits.is_empty() {
        quote!()
    } else {
        quote!(#[derive(#(#traits),*)])
    }
}

/// Marks a type as a Spindle message.
///
/// Derives `Clone` and `Debug` when they are not already derived, and adds a compile-time
/// assertion that the type is `Send + 'static`, the bound every mailbox payload carries.
///
/// ```ignore
/// use spindle_macro::spindle_message;
///
/// #[spindle_message]
/// pub struct Put {
///     pub key: String,
///     pub value: String,
/// }
/// ```
#[proc_macro_attribute]
pub fn spindle_message(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let mut traits = Vec::new();
    if !has_derive(&input, "Clone") {
        traits.push(quote!(Clone));
    }
    if !has_derive(&input, "Debug") {
        traits.push(quote!(Debug));
    }
    let derives = derive_list(traits);

    let assert_ident = quote::format_ident!("_AssertSpindleMessage_{}", name);

    let expanded = quote! {
        #derives
        #input

        #[doc(hidden)]
        #[allow(dead_code, non_camel_case_types, non_snake_case, clippy::needless_lifetimes)]
        const _: () = {
            fn #assert_ident #impl_generics () #where_clause {
                fn assert_bounds<T: Send + 'static>() {}
                assert_bounds::<#name #ty_generics>();
            }
        };
    };

    TokenStream::from(expanded)
}

/// Marks a type as process state.
///
/// Derives `Debug` when it is not already derived and asserts the type is `Send + 'static`
/// so it can live inside a process task. Pass `default` to also derive `Default`:
///
/// ```ignore
/// use spindle_macro::spindle_state;
///
/// #[spindle_state(default)]
/// pub struct Store {
///     entries: std::collections::HashMap<String, String>,
/// }
/// ```
#[proc_macro_attribute]
pub fn spindle_state(attr: TokenStream, item: TokenStream) -> TokenStream {
    let config = StateConfig::parse(&attr);
    let input = parse_macro_input!(item as DeriveInput);

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let mut traits = Vec::new();
    if config.default && !has_derive(&input, "Default") {
        traits.push(quote!(Default));
    }
    if !has_derive(&input, "Debug") {
        traits.push(quote!(Debug));
    }
    let derives = derive_list(traits);

    let assert_ident = quote::format_ident!("_AssertSpindleState_{}", name);

    let expanded = quote! {
        #derives
        #input

        #[doc(hidden)]
        #[allow(dead_code, non_camel_case_types, non_snake_case, clippy::needless_lifetimes)]
        const _: () = {
            fn #assert_ident #impl_generics () #where_clause {
                fn assert_bounds<T: Send + 'static>() {}
                assert_bounds::<#name #ty_generics>();
            }
        };
    };

    TokenStream::from(expanded)
}
