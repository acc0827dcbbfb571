//! Tagged enumerations describing a pet.
//!
//! Every variant has a lowercase string tag. The tag is what the renderer
//! receives on the wire and what the extra-pet store persists, so the
//! `serde` representation and `as_str` must agree.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A string did not name any variant of the expected enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownTag {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! tagged_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal, default = $default:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $tag:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $tag)] $variant, )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[ $( $name::$variant, )+ ];

            /// The wire/persisted tag for this variant.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $tag, )+
                }
            }

            /// Parse a tag, falling back to the default for anything unknown.
            pub fn parse_or_default(value: &str) -> Self {
                value.parse().unwrap_or_default()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownTag;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $( $tag => Ok($name::$variant), )+
                    other => Err(UnknownTag {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

tagged_enum! {
    /// Species of a pet.
    PetType, "pet type", default = Cat {
        Cat => "cat",
        Clippy => "clippy",
        Crab => "crab",
        Dog => "dog",
        Rocky => "rocky",
        Rubberduck => "rubberduck",
        Snake => "snake",
        Totoro => "totoro",
        Zappy => "zappy",
    }
}

tagged_enum! {
    /// Palette a pet is drawn in.
    PetColor, "pet color", default = Brown {
        Black => "black",
        Brown => "brown",
        Green => "green",
        Yellow => "yellow",
        Gray => "gray",
        Red => "red",
        /// Renderer-side "no color" marker. Accepted from configuration.
        Null => "null",
    }
}

tagged_enum! {
    /// Rendered scale of a pet.
    PetSize, "pet size", default = Nano {
        Nano => "nano",
        Medium => "medium",
        Large => "large",
    }
}

/// How a pet type's color is chosen when spawning interactively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorChoice {
    /// The type only exists in one palette; no prompt is needed.
    Fixed(PetColor),
    /// The user picks one of these colors.
    Pick(&'static [PetColor]),
}

impl PetType {
    /// Colors offered to the user when spawning this type.
    pub fn color_choices(self) -> ColorChoice {
        match self {
            PetType::Rubberduck | PetType::Zappy => ColorChoice::Fixed(PetColor::Yellow),
            PetType::Snake => ColorChoice::Fixed(PetColor::Green),
            PetType::Rocky | PetType::Totoro => ColorChoice::Fixed(PetColor::Gray),
            PetType::Crab => ColorChoice::Fixed(PetColor::Red),
            PetType::Cat => {
                ColorChoice::Pick(&[PetColor::Black, PetColor::Brown, PetColor::Red])
            }
            PetType::Dog => ColorChoice::Pick(&[PetColor::Black, PetColor::Brown]),
            PetType::Clippy => ColorChoice::Pick(&[
                PetColor::Black,
                PetColor::Brown,
                PetColor::Green,
                PetColor::Yellow,
            ]),
        }
    }
}
