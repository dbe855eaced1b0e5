//! Flyer option groups: template, shape, sector, platform and pose.
//!
//! Each group is a closed enum, so a [`SelectionState`] holds exactly one
//! active option per group. Wire values match what the backend accepts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Returned when a string names no option of a group.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {group} '{value}' (expected one of: {expected})")]
pub struct UnknownOption {
    pub group: &'static str,
    pub value: String,
    pub expected: String,
}

macro_rules! option_group {
    (
        $(#[$meta:meta])*
        $name:ident, $group:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $wire)] $variant ),+
        }

        impl $name {
            /// Every option, in display order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Wire value sent to the backend.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownOption;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|o| o.as_str().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| UnknownOption {
                        group: $group,
                        value: s.to_string(),
                        expected: $name::ALL
                            .iter()
                            .map(|o| o.as_str())
                            .collect::<Vec<_>>()
                            .join(", "),
                    })
            }
        }
    };
}

option_group! {
    /// Output layout / aspect preset.
    Template, "template" {
        #[default]
        SquarePost => "square_post",
        Quote => "quote",
        Carousel => "carousel",
        LandscapePost => "landscape_post",
        Thumbnail => "thumbnail",
        YoutubeBanner => "youtube_banner",
        WebBanner => "web_banner",
        Presentation => "presentation",
        Story => "story",
        Document => "document",
        Print => "print",
        Infographic => "infographic",
    }
}

impl Template {
    /// Pixel size of the finished download for this template.
    ///
    /// The backend reports the same size in its response; this is the
    /// client-side copy for listings and offline resizing.
    pub fn target_size(self) -> (u32, u32) {
        match self {
            Template::SquarePost | Template::Quote | Template::Carousel => (1080, 1080),
            Template::LandscapePost => (1200, 628),
            Template::Thumbnail => (1280, 720),
            Template::YoutubeBanner => (2048, 1152),
            Template::WebBanner => (1920, 600),
            Template::Presentation => (1920, 1080),
            Template::Story | Template::Infographic => (1080, 1920),
            Template::Document | Template::Print => (1240, 1754),
        }
    }

    /// Suggested filename for the downloaded flyer.
    pub fn download_name(self) -> &'static str {
        match self {
            Template::SquarePost => "square-post.png",
            Template::LandscapePost => "landscape-post.png",
            Template::Story => "story.png",
            Template::Carousel => "carousel-1.png",
            Template::Thumbnail => "thumbnail.png",
            Template::YoutubeBanner => "youtube-banner.png",
            Template::WebBanner => "web-banner.png",
            Template::Quote => "quote.png",
            Template::Presentation => "presentation.png",
            Template::Document => "document.png",
            Template::Print => "print.png",
            Template::Infographic => "infographic.png",
        }
    }
}

option_group! {
    /// Container shape the product is rendered as.
    Shape, "shape" {
        #[default]
        Bottle => "bottle",
        Can => "can",
        Box => "box",
        Pouch => "pouch",
        Jar => "jar",
        Tube => "tube",
        Bag => "bag",
    }
}

option_group! {
    /// Market sector, used for background and styling cues.
    Sector, "sector" {
        #[default]
        Beverages => "Beverages",
        Food => "Food",
        Snacks => "Snacks",
        Dairy => "Dairy",
        Cosmetics => "Cosmetics",
        Household => "Household",
        Pharma => "Pharma",
    }
}

option_group! {
    /// Social platform the flyer targets.
    Platform, "platform" {
        #[default]
        Instagram => "instagram",
        Facebook => "facebook",
        Linkedin => "linkedin",
        X => "x",
        Tiktok => "tiktok",
        Youtube => "youtube",
        Web => "web",
    }
}

option_group! {
    /// Camera pose for the rendered product.
    Pose, "pose" {
        #[default]
        FlatLay => "flat_lay",
        FrontStraight => "front_straight",
        AngledHero => "angled_hero",
        Isometric => "isometric",
    }
}

/// The active option of every group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectionState {
    pub template: Template,
    pub shape: Shape,
    pub sector: Sector,
    pub platform: Platform,
    pub pose: Pose,
}

impl SelectionState {
    /// Restore every group to its default option.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documented_defaults() {
        let s = SelectionState::default();
        assert_eq!(s.template, Template::SquarePost);
        assert_eq!(s.shape, Shape::Bottle);
        assert_eq!(s.sector, Sector::Beverages);
        assert_eq!(s.platform, Platform::Instagram);
        assert_eq!(s.pose, Pose::FlatLay);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut s = SelectionState {
            template: Template::Story,
            shape: Shape::Can,
            sector: Sector::Snacks,
            platform: Platform::Tiktok,
            pose: Pose::Isometric,
        };
        s.reset();
        assert_eq!(s, SelectionState::default());
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("STORY".parse::<Template>().unwrap(), Template::Story);
        assert_eq!("beverages".parse::<Sector>().unwrap(), Sector::Beverages);
        assert_eq!("angled_hero".parse::<Pose>().unwrap(), Pose::AngledHero);
    }

    #[test]
    fn unknown_option_lists_choices() {
        let err = "hexagon".parse::<Shape>().unwrap_err();
        assert_eq!(err.group, "shape");
        assert!(err.expected.contains("bottle"));
        assert!(err.to_string().contains("hexagon"));
    }

    #[test]
    fn template_sizes_and_names() {
        assert_eq!(Template::SquarePost.target_size(), (1080, 1080));
        assert_eq!(Template::WebBanner.target_size(), (1920, 600));
        assert_eq!(Template::Carousel.download_name(), "carousel-1.png");
        assert_eq!(Template::ALL.len(), 12);
    }

    #[test]
    fn wire_values_round_trip_through_serde() {
        let s = SelectionState::default();
        let json = serde_json::to_value(s).unwrap();
        assert_eq!(json["template"], "square_post");
        assert_eq!(json["sector"], "Beverages");
        assert_eq!(json["pose"], "flat_lay");
    }
}
