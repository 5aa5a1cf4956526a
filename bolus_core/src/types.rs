//! Small value types shared by the calculators.

use std::fmt;
use std::str::FromStr;

use crate::error::DoseError;

/// Blood-glucose unit the profile and inputs are expressed in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum UnitMode {
    /// mmol/L
    #[default]
    Mmol,
    /// mg/dL
    Mgdl,
}

impl UnitMode {
    /// BG below this value triggers the hypoglycemia guard.
    pub fn hypo_threshold(self) -> f64 {
        match self {
            UnitMode::Mmol => 3.9,
            UnitMode::Mgdl => 70.0,
        }
    }

    /// Numerator of the ISF-from-TDD rule (rule of 100 / rule of 1800).
    pub fn isf_rule(self) -> f64 {
        match self {
            UnitMode::Mmol => 100.0,
            UnitMode::Mgdl => 1800.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            UnitMode::Mmol => "mmol/L",
            UnitMode::Mgdl => "mg/dL",
        }
    }
}

impl FromStr for UnitMode {
    type Err = DoseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mmol" | "mmol/l" => Ok(UnitMode::Mmol),
            "mgdl" | "mg/dl" => Ok(UnitMode::Mgdl),
            _ => Err(DoseError::UnknownValue {
                kind: "unit mode",
                value: s.to_string(),
            }),
        }
    }
}

impl From<bolus_config::UnitMode> for UnitMode {
    fn from(m: bolus_config::UnitMode) -> Self {
        match m {
            bolus_config::UnitMode::Mmol => UnitMode::Mmol,
            bolus_config::UnitMode::Mgdl => UnitMode::Mgdl,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Meal {
    Breakfast,
    Lunch,
    Dinner,
}

impl Meal {
    pub const ALL: [Meal; 3] = [Meal::Breakfast, Meal::Lunch, Meal::Dinner];

    pub fn as_str(self) -> &'static str {
        match self {
            Meal::Breakfast => "breakfast",
            Meal::Lunch => "lunch",
            Meal::Dinner => "dinner",
        }
    }
}

impl fmt::Display for Meal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Meal {
    type Err = DoseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Meal::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DoseError::UnknownValue {
                kind: "meal",
                value: s.to_string(),
            })
    }
}

/// One value per meal slot; a keyed lookup table, not a map, so every slot exists.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MealTable<T> {
    pub breakfast: T,
    pub lunch: T,
    pub dinner: T,
}

impl<T> MealTable<T> {
    pub fn get(&self, meal: Meal) -> &T {
        match meal {
            Meal::Breakfast => &self.breakfast,
            Meal::Lunch => &self.lunch,
            Meal::Dinner => &self.dinner,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Meal, &T)> {
        Meal::ALL.into_iter().map(move |m| (m, self.get(m)))
    }
}

/// Smallest deliverable dose step of the pen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PenIncrement {
    #[default]
    Half,
    Whole,
}

impl PenIncrement {
    #[inline]
    pub fn units(self) -> f64 {
        match self {
            PenIncrement::Half => 0.5,
            PenIncrement::Whole => 1.0,
        }
    }
}

impl fmt::Display for PenIncrement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.units())
    }
}

impl TryFrom<f64> for PenIncrement {
    type Error = DoseError;
    fn try_from(v: f64) -> Result<Self, Self::Error> {
        if v == 0.5 {
            Ok(PenIncrement::Half)
        } else if v == 1.0 {
            Ok(PenIncrement::Whole)
        } else {
            Err(DoseError::InvalidParameter("pen increment must be 0.5 or 1.0"))
        }
    }
}

/// Food tags the engine understands; anything else is carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FoodTag {
    LowGi,
    HighGi,
    Alcohol,
    Other(String),
}

impl FromStr for FoodTag {
    type Err = DoseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim().to_ascii_lowercase();
        Ok(match t.as_str() {
            "" => {
                return Err(DoseError::UnknownValue {
                    kind: "food tag",
                    value: s.to_string(),
                });
            }
            "low_gi" | "low-gi" => FoodTag::LowGi,
            "high_gi" | "high-gi" => FoodTag::HighGi,
            "alcohol" => FoodTag::Alcohol,
            _ => FoodTag::Other(t),
        })
    }
}

impl fmt::Display for FoodTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FoodTag::LowGi => f.write_str("low_gi"),
            FoodTag::HighGi => f.write_str("high_gi"),
            FoodTag::Alcohol => f.write_str("alcohol"),
            FoodTag::Other(t) => f.write_str(t),
        }
    }
}

/// Defer `pct` of a dose by `delay_min` minutes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StaggerPolicy {
    pub pct: f64,
    pub delay_min: u32,
}

impl StaggerPolicy {
    pub const NONE: StaggerPolicy = StaggerPolicy {
        pct: 0.0,
        delay_min: 0,
    };

    /// Staggering only happens for a strictly positive fraction.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.pct > 0.0
    }
}

impl From<bolus_config::StaggerCfg> for StaggerPolicy {
    fn from(c: bolus_config::StaggerCfg) -> Self {
        Self {
            pct: c.pct,
            delay_min: c.delay_min,
        }
    }
}

/// Stagger hints keyed by glycemic tag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GiSplitDefaults {
    pub low_gi: StaggerPolicy,
    /// Carried for completeness; high-GI food never staggers automatically.
    pub high_gi: StaggerPolicy,
}

impl Default for GiSplitDefaults {
    fn default() -> Self {
        Self {
            low_gi: StaggerPolicy {
                pct: 0.3,
                delay_min: 60,
            },
            high_gi: StaggerPolicy::NONE,
        }
    }
}
