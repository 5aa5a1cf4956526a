#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Meal bolus decision engine.
//!
//! Pure, synchronous calculators that turn a dosing profile and a meal's facts
//! into a dose, its breakdown, and an injection timing plan. Nothing here does
//! I/O or keeps state between calls; identical inputs give equal results.
//!
//! ## Architecture
//!
//! - **Primitives**: pen rounding, clamping, one-decimal display (`round`)
//! - **Correction**: BG excess to units with dead-band and IOB offset (`correction`)
//! - **Splitter**: per-shot capping with drift reconciliation (`splitter`)
//! - **Plan**: immediate shots plus an optional staggered dose (`plan`)
//! - **Meal dose**: orchestration and stagger policy selection (`meal`)
//!
//! ## Rounding
//!
//! Every rounding step uses ties-toward-+inf on the ratio `units / increment`
//! and every threshold comparison uses the same absolute epsilon (`round::EPS`).

pub mod config;
pub mod conversions;
pub mod correction;
pub mod error;
pub mod meal;
pub mod plan;
pub mod portion;
pub mod round;
pub mod splitter;
pub mod types;

pub use config::DosingSettings;
pub use correction::{Correction, CorrectionParams, calc_correction_dose, calc_isf_from_tdd};
pub use error::DoseError;
pub use meal::{
    DoseBreakdown, DoseCalculation, DoseInputs, DoseResult, StaggerChoice, calc_meal_dose,
    calculate, select_stagger,
};
pub use plan::{SplitPlan, SplitPlanParams, build_split_plan};
pub use portion::{carbs_for_portion, portion_unit};
pub use round::{clamp, fmt1, round_to_pen};
pub use splitter::{effective_cap, split_into_injections};
pub use types::{FoodTag, GiSplitDefaults, Meal, MealTable, PenIncrement, StaggerPolicy, UnitMode};
