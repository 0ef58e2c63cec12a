//! Deterministic frame colors.
//!
//! Colors come from a hash of the frame name, so the same frame gets the
//! same color everywhere in a graph and across runs. The palette is the
//! classic "hot" one: red dominant, with green and blue moving together.

use std::borrow::Cow;
use std::fmt;

/// An sRGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

/// Color of a frame label
///
/// **Public** - pure function, identical labels always give identical colors
pub fn color_for(frame: &str) -> Rgb {
    let v1 = name_hash(frame);
    let reversed: String = frame.chars().rev().collect();
    let v3 = name_hash(&reversed);

    let green = 50 + (80.0 * v1) as u8;
    Rgb {
        r: 200 + (55.0 * v3) as u8,
        g: green,
        b: green,
    }
}

/// Hash the first few characters of a name into `[0, 1)`
///
/// Each character contributes `(code % m) / (m - 1)`, weighted by a factor
/// that decays by 0.7 per position, with `m` growing from 10 to 12.
fn name_hash(name: &str) -> f64 {
    let name = abbreviate_module(name);

    let mut vector = 0.0;
    let mut weight = 1.0;
    let mut max = 1.0;
    let mut modulus: u32 = 10;

    for ch in name.chars() {
        let i = u32::from(ch) % modulus;
        vector += f64::from(i) / f64::from(modulus - 1) * weight;
        modulus += 1;
        max += weight;
        weight *= 0.7;
        if modulus > 12 {
            break;
        }
    }

    vector / max
}

/// `module!symbol` -> `m!symbol`, so frames of one module hash alike
fn abbreviate_module(name: &str) -> Cow<'_, str> {
    match name.split_once('!') {
        Some((module, symbol)) => match module.chars().next() {
            Some(first) => Cow::Owned(format!("{}!{}", first, symbol)),
            None => Cow::Borrowed(name),
        },
        None => Cow::Borrowed(name),
    }
}
