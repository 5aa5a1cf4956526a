#![no_main]
use bolus_core::{DoseInputs, DosingSettings, FoodTag, Meal, PenIncrement, calc_meal_dose};
use libfuzzer_sys::arbitrary::{self, Arbitrary};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
    meal: u8,
    carbs: f64,
    bg: f64,
    iob: Option<f64>,
    high_fat_protein: Option<bool>,
    low_gi: bool,
    high_gi: bool,
    whole_units: bool,
    max_dose: f64,
    max_single_dose: f64,
}

fuzz_target!(|input: Input| {
    let settings = DosingSettings {
        pen_increment: if input.whole_units {
            PenIncrement::Whole
        } else {
            PenIncrement::Half
        },
        max_dose: input.max_dose,
        max_single_dose: input.max_single_dose,
        ..DosingSettings::default()
    };
    if settings.validate().is_err() || settings.max_dose > 1e4 || settings.max_single_dose > 1e4 {
        return;
    }
    let mut tags = Vec::new();
    if input.low_gi {
        tags.push(FoodTag::LowGi);
    }
    if input.high_gi {
        tags.push(FoodTag::HighGi);
    }
    let inputs = DoseInputs {
        iob: input.iob,
        high_fat_protein: input.high_fat_protein,
        tags,
        ..DoseInputs::new(
            Meal::ALL[usize::from(input.meal) % Meal::ALL.len()],
            input.carbs,
            input.bg,
        )
    };
    if let Ok(r) = calc_meal_dose(&settings, &inputs) {
        let step = settings.pen_increment.units();
        assert!(r.total() <= settings.max_dose + step + 1e-6, "{r:?}");
        for shot in r.plan.injections_now.iter().chain(r.plan.injection_later.iter()) {
            assert!(*shot > 0.0, "{r:?}");
        }
    }
});
