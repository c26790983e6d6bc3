//! Device features and their grouping into command implementations.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// A device method, identified on the wire by its snake_case name.
///
/// Most features come in pairs: one for the main light and a `bg_` twin for
/// the background light of dual-light fixtures. Toggle has a third,
/// device-wide variant.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use yeelight_rs::Feature;
///
/// assert_eq!(Feature::BgSetCtAbx.to_string(), "bg_set_ct_abx");
/// assert_eq!(Feature::from_str("dev_toggle").unwrap(), Feature::DevToggle);
/// assert!(Feature::from_str("set_scene").is_err());
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    Display,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Feature {
    SetCtAbx,
    BgSetCtAbx,
    SetRgb,
    BgSetRgb,
    SetHsv,
    BgSetHsv,
    SetBright,
    BgSetBright,
    SetPower,
    BgSetPower,
    Toggle,
    BgToggle,
    DevToggle,
    SetDefault,
    BgSetDefault,
    StartCf,
    BgStartCf,
    StopCf,
    BgStopCf,
}

/// A set of features served by one command implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
pub enum FeatureGroup {
    Temperature,
    Rgb,
    Hsv,
    Brightness,
    Power,
    Toggle,
    Default,
    StartFlow,
    StopFlow,
}

/// Which light of a fixture a feature acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightTarget {
    Main,
    Background,
    /// Both lights at once.
    Device,
}

impl Feature {
    /// The wire method name.
    pub fn method(&self) -> &'static str {
        (*self).into()
    }

    /// The command group implementing this feature.
    pub fn group(&self) -> FeatureGroup {
        match self {
            Feature::SetCtAbx | Feature::BgSetCtAbx => FeatureGroup::Temperature,
            Feature::SetRgb | Feature::BgSetRgb => FeatureGroup::Rgb,
            Feature::SetHsv | Feature::BgSetHsv => FeatureGroup::Hsv,
            Feature::SetBright | Feature::BgSetBright => FeatureGroup::Brightness,
            Feature::SetPower | Feature::BgSetPower => FeatureGroup::Power,
            Feature::Toggle | Feature::BgToggle | Feature::DevToggle => FeatureGroup::Toggle,
            Feature::SetDefault | Feature::BgSetDefault => FeatureGroup::Default,
            Feature::StartCf | Feature::BgStartCf => FeatureGroup::StartFlow,
            Feature::StopCf | Feature::BgStopCf => FeatureGroup::StopFlow,
        }
    }

    /// The light this feature acts on.
    pub fn target(&self) -> LightTarget {
        match self {
            Feature::DevToggle => LightTarget::Device,
            Feature::BgSetCtAbx
            | Feature::BgSetRgb
            | Feature::BgSetHsv
            | Feature::BgSetBright
            | Feature::BgSetPower
            | Feature::BgToggle
            | Feature::BgSetDefault
            | Feature::BgStartCf
            | Feature::BgStopCf => LightTarget::Background,
            Feature::SetCtAbx
            | Feature::SetRgb
            | Feature::SetHsv
            | Feature::SetBright
            | Feature::SetPower
            | Feature::Toggle
            | Feature::SetDefault
            | Feature::StartCf
            | Feature::StopCf => LightTarget::Main,
        }
    }
}

impl FeatureGroup {
    /// Whether `feature` is served by this group.
    ///
    /// Kept independent from [`Feature::group`] so the two can be checked
    /// against each other.
    pub fn contains(&self, feature: Feature) -> bool {
        match self {
            FeatureGroup::Temperature => {
                matches!(feature, Feature::SetCtAbx | Feature::BgSetCtAbx)
            }
            FeatureGroup::Rgb => matches!(feature, Feature::SetRgb | Feature::BgSetRgb),
            FeatureGroup::Hsv => matches!(feature, Feature::SetHsv | Feature::BgSetHsv),
            FeatureGroup::Brightness => {
                matches!(feature, Feature::SetBright | Feature::BgSetBright)
            }
            FeatureGroup::Power => matches!(feature, Feature::SetPower | Feature::BgSetPower),
            FeatureGroup::Toggle => matches!(
                feature,
                Feature::Toggle | Feature::BgToggle | Feature::DevToggle
            ),
            FeatureGroup::Default => {
                matches!(feature, Feature::SetDefault | Feature::BgSetDefault)
            }
            FeatureGroup::StartFlow => matches!(feature, Feature::StartCf | Feature::BgStartCf),
            FeatureGroup::StopFlow => matches!(feature, Feature::StopCf | Feature::BgStopCf),
        }
    }
}
