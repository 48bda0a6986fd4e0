use std::collections::HashMap;

use proc_macro2::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, LitStr};

#[proc_macro_derive(Layer)]
pub fn derive_layer(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    let name = ast.ident;
    let variants = match ast.data {
        Data::Enum(ref data) => data
            .variants
            .iter()
            .map(|v| match v.fields {
                Fields::Unit => Ok(&v.ident),
                _ => Err(syn::Error::new_spanned(v, "Layer variants must not carry data")),
            })
            .collect::<Result<Vec<_>, _>>(),
        _ => Err(syn::Error::new_spanned(
            &name,
            "Layer can only be derived for enums",
        )),
    };
    let variants = match variants {
        Ok(variants) => variants,
        Err(e) => return e.to_compile_error().into(),
    };
    if variants.len() > 32 {
        return syn::Error::new_spanned(&name, "a layout has at most 32 layers")
            .to_compile_error()
            .into();
    }

    let index_arms = variants.iter().enumerate().map(|(i, v)| {
        let i = i as u8;
        quote! { #name::#v => #i, }
    });
    let from_arms = variants.iter().enumerate().map(|(i, v)| {
        let i = i as u8;
        quote! { #i => Some(#name::#v), }
    });

    let expanded = quote! {
        impl sofle_kbd::keyboard::Layer for #name {
            fn index(&self) -> u8 {
                match self {
                    #(#index_arms)*
                }
            }

            fn from_index(index: u8) -> Option<Self> {
                match index {
                    #(#from_arms)*
                    _ => None,
                }
            }
        }
    };

    proc_macro::TokenStream::from(expanded)
}

macro_rules! key {
    ($n:tt, $i:ident) => {
        ($n, quote!(sofle_kbd::keyboard::Action::Key(sofle_kbd::keyboard::Key::$i)))
    };
    ($i:ident) => {
        (
            stringify!($i),
            quote!(sofle_kbd::keyboard::Action::Key(sofle_kbd::keyboard::Key::$i)),
        )
    };
}

fn symbols() -> HashMap<&'static str, TokenStream> {
    [
        ("", quote!(sofle_kbd::keyboard::Action::No)),
        ("Trn", quote!(sofle_kbd::keyboard::Action::Transparent)),
        ("Boot", quote!(sofle_kbd::keyboard::Action::Bootloader)),
        ("Lock", quote!(sofle_kbd::keyboard::Action::KeyLock)),
        key!(A),
        key!(B),
        key!(C),
        key!(D),
        key!(E),
        key!(F),
        key!(G),
        key!(H),
        key!(I),
        key!(J),
        key!(K),
        key!(L),
        key!(M),
        key!(N),
        key!(O),
        key!(P),
        key!(Q),
        key!(R),
        key!(S),
        key!(T),
        key!(U),
        key!(V),
        key!(W),
        key!(X),
        key!(Y),
        key!(Z),
        key!("1", Digit1_Exclamation),
        key!("2", Digit2_At),
        key!("3", Digit3_Number),
        key!("4", Digit4_Dollar),
        key!("5", Digit5_Percent),
        key!("6", Digit6_Circumflex),
        key!("7", Digit7_Ampersand),
        key!("8", Digit8_Asterisk),
        key!("9", Digit9_LeftParenthesis),
        key!("0", Digit0_RightParenthesis),
        key!(Enter),
        key!("Esc", Escape),
        key!("BSpc", Backspace),
        key!("Del", Delete),
        key!(Tab),
        key!(Space),
        key!("-", HyphenMinus_LowLine),
        key!("=", Equal_Plus),
        key!("[", LeftSquareBracket_LeftCurlyBracket),
        key!("]", RightSquareBracket_RightCurlyBracket),
        key!("\\", Backslash_VerticalBar),
        key!(";", Semicolon_Colon),
        key!("'", Apostrophe_Quotation),
        key!("`", Grave_Tilde),
        key!(",", Comma_LessThan),
        key!(".", Period_GreaterThan),
        key!("/", Slash_Question),
        key!("Caps", CapsLock),
        key!(F1),
        key!(F2),
        key!(F3),
        key!(F4),
        key!(F5),
        key!(F6),
        key!(F7),
        key!(F8),
        key!(F9),
        key!(F10),
        key!(F11),
        key!(F12),
        key!(F13),
        key!(F14),
        key!(F15),
        key!(F16),
        key!(F17),
        key!(F18),
        key!(F19),
        key!(F20),
        key!(F21),
        key!(F22),
        key!(F23),
        key!(F24),
        key!("PrScr", PrintScreen),
        key!("ScLck", ScrollLock),
        key!(Pause),
        key!("Ins", Insert),
        key!(Home),
        key!("PgUp", PageUp),
        key!(End),
        key!("PgDn", PageDown),
        key!("Right", RightArrow),
        key!("Left", LeftArrow),
        key!("Down", DownArrow),
        key!("Up", UpArrow),
        key!("LCtl", LeftControl),
        key!("LSft", LeftShift),
        key!("LAlt", LeftAlt),
        key!("LGui", LeftGui),
        key!("RCtl", RightControl),
        key!("RSft", RightShift),
        key!("RAlt", RightAlt),
        key!("RGui", RightGui),
        key!(Mute),
        key!("VolUp", VolumeUp),
        key!("VolDn", VolumeDown),
        key!("MPlay", MediaPlay),
        key!("MPau", MediaPause),
        key!("MNext", MediaNextTrack),
        key!("MPrev", MediaPrevTrack),
        key!("MStop", MediaStop),
        key!("MPlPs", MediaPlayPause),
        key!("MMute", MediaMute),
        key!("MVlUp", MediaVolumeIncrement),
        key!("MVlDn", MediaVolumeDecrement),
        key!("BriUp", MediaBrightnessIncrement),
        key!("BriDn", MediaBrightnessDecrement),
        key!("MsUp", MouseUp),
        key!("MsDn", MouseDown),
        key!("MsLt", MouseLeft),
        key!("MsRt", MouseRight),
        key!("WhUp", WheelUp),
        key!("WhDn", WheelDown),
        key!("WhLt", WheelLeft),
        key!("WhRt", WheelRight),
        key!("Btn1", MouseButton1),
        key!("Btn2", MouseButton2),
        key!("Btn3", MouseButton3),
        key!("Btn4", MouseButton4),
        key!("Btn5", MouseButton5),
    ]
    .into_iter()
    .collect()
}

fn modifier(name: &str) -> Option<TokenStream> {
    let flag = match name {
        "LCtl" => quote!(LCTL),
        "LSft" => quote!(LSFT),
        "LAlt" => quote!(LALT),
        "LGui" => quote!(LGUI),
        "RCtl" => quote!(RCTL),
        "RSft" => quote!(RSFT),
        "RAlt" => quote!(RALT),
        "RGui" => quote!(RGUI),
        _ => return None,
    };
    Some(quote!(sofle_kbd::keyboard::Modifiers::#flag))
}

/// `TD(n)` and friends: the name and the text between the parentheses.
fn call(cell: &str) -> Option<(&str, &str)> {
    let (name, rest) = cell.split_once('(')?;
    let args = rest.strip_suffix(')')?;
    Some((name.trim(), args.trim()))
}

fn cell(symbol: &str, table: &HashMap<&'static str, TokenStream>) -> Result<TokenStream, String> {
    if let Some(st) = table.get(symbol) {
        return Ok(st.clone());
    }
    if let Some(expr) = symbol.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
        return syn::parse_str::<syn::Expr>(expr)
            .map(|expr| quote!(#expr))
            .map_err(|e| format!("layout: bad expression {{{}}}: {}", expr, e));
    }
    let unknown = || format!("layout: Unknown symbol: {}", symbol);
    let (name, args) = call(symbol).ok_or_else(unknown)?;
    let number = || args.parse::<u8>().map_err(|_| unknown());
    match name {
        "TD" => {
            let n = number()?;
            Ok(quote!(sofle_kbd::keyboard::Action::TapDance(#n)))
        }
        "TT" => {
            let n = number()?;
            Ok(quote!(sofle_kbd::keyboard::Action::LayerTapToggle(#n)))
        }
        "TG" => {
            let n = number()?;
            Ok(quote!(sofle_kbd::keyboard::Action::LayerToggle(#n)))
        }
        "MT" => {
            let (m, k) = args.split_once(',').ok_or_else(unknown)?;
            let modifiers = m
                .split('+')
                .map(|m| modifier(m.trim()))
                .collect::<Option<Vec<_>>>()
                .ok_or_else(unknown)?;
            let tap = cell(k.trim(), table)?;
            Ok(quote!(sofle_kbd::keyboard::action::mod_tap(
                sofle_kbd::keyboard::Modifiers::empty() #(.union(#modifiers))*,
                #tap
            )))
        }
        _ => Err(unknown()),
    }
}

/// Turns a table of `|`-separated cells into `[[Action; C]; R]`.
#[proc_macro]
pub fn layout(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as LitStr).value();
    let table = symbols();

    let array = input
        .trim()
        .lines()
        .map(&str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let array = line
                .split('|')
                .map(&str::trim)
                .collect::<Vec<_>>()
                .into_iter()
                .skip(1)
                .rev()
                .skip(1)
                .rev()
                .map(|k| cell(k, &table).unwrap_or_else(|message| quote!(compile_error!(#message))))
                .map(|t| quote! {#t,})
                .collect::<TokenStream>();
            quote! {
                [#array]
            }
        })
        .map(|t| quote! {#t,})
        .collect::<TokenStream>();

    let expanded = quote! {
        [#array]
    };

    proc_macro::TokenStream::from(expanded)
}
