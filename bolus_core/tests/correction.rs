use bolus_core::error::DoseError;
use bolus_core::{
    CorrectionParams, PenIncrement, UnitMode, calc_correction_dose, calc_isf_from_tdd,
};
use rstest::rstest;

fn base() -> CorrectionParams {
    CorrectionParams {
        current_bg: 8.0,
        target_bg: 6.0,
        isf: 2.0,
        pen_increment: PenIncrement::Half,
        max_dose: 25.0,
        ..Default::default()
    }
}

#[test]
fn two_above_target_with_isf_two_is_one_unit() {
    let c = calc_correction_dose(&base()).unwrap();
    assert_eq!(c.raw, 1.0);
    assert_eq!(c.recommended, 1.0);
}

#[rstest]
#[case::at_target(6.0)]
#[case::below_target(5.0)]
#[case::inside_dead_band(6.1)]
#[case::on_dead_band_edge(6.5)]
fn no_correction_near_or_below_target(#[case] bg: f64) {
    let c = calc_correction_dose(&CorrectionParams {
        current_bg: bg,
        ..base()
    })
    .unwrap();
    assert_eq!(c.raw, 0.0);
    assert_eq!(c.recommended, 0.0);
}

#[test]
fn insulin_on_board_is_subtracted() {
    let c = calc_correction_dose(&CorrectionParams {
        iob: 0.5,
        iob_fraction: 1.0,
        ..base()
    })
    .unwrap();
    assert_eq!(c.raw, 0.5);
    assert_eq!(c.recommended, 0.5);
}

#[test]
fn partial_iob_fraction() {
    // 1.0u needed, half of 1.0u IOB counted -> 0.5u
    let c = calc_correction_dose(&CorrectionParams {
        iob: 1.0,
        iob_fraction: 0.5,
        ..base()
    })
    .unwrap();
    assert_eq!(c.recommended, 0.5);
}

#[test]
fn insulin_on_board_can_absorb_the_whole_correction() {
    let c = calc_correction_dose(&CorrectionParams {
        iob: 0.8,
        ..base()
    })
    .unwrap();
    assert_eq!(c.raw, 0.0);
    assert_eq!(c.recommended, 0.0);
}

#[test]
fn capped_at_max_dose() {
    let c = calc_correction_dose(&CorrectionParams {
        current_bg: 20.0,
        max_dose: 5.0,
        ..base()
    })
    .unwrap();
    assert_eq!(c.raw, 7.0);
    assert_eq!(c.recommended, 5.0);
}

#[test]
fn rounded_to_pen_increment() {
    let c = calc_correction_dose(&CorrectionParams {
        current_bg: 7.6,
        ..base()
    })
    .unwrap();
    assert_eq!(c.recommended, 1.0);

    let whole = calc_correction_dose(&CorrectionParams {
        current_bg: 9.2,
        pen_increment: PenIncrement::Whole,
        ..base()
    })
    .unwrap();
    assert_eq!(whole.recommended, 2.0);
}

#[test]
fn whole_unit_pen_widens_the_dead_band() {
    // 0.9 above target, ISF 2: outside a 0.5 mmol/L band, inside a 1.0 band
    let half = calc_correction_dose(&CorrectionParams {
        current_bg: 6.9,
        ..base()
    })
    .unwrap();
    let whole = calc_correction_dose(&CorrectionParams {
        current_bg: 6.9,
        pen_increment: PenIncrement::Whole,
        ..base()
    })
    .unwrap();
    assert_eq!(half.recommended, 0.5);
    assert_eq!(whole.recommended, 0.0);
}

#[rstest]
#[case(0.0)]
#[case(-1.0)]
#[case(f64::INFINITY)]
fn invalid_isf_fails_fast(#[case] isf: f64) {
    let err = calc_correction_dose(&CorrectionParams { isf, ..base() })
        .expect_err("ISF must be rejected");
    assert_eq!(
        err.downcast_ref::<DoseError>(),
        Some(&DoseError::InvalidParameter("ISF must be > 0"))
    );
}

#[rstest]
#[case(50.0, UnitMode::Mmol, 2.0)]
#[case(100.0, UnitMode::Mmol, 1.0)]
#[case(50.0, UnitMode::Mgdl, 36.0)]
#[case(100.0, UnitMode::Mgdl, 18.0)]
fn isf_from_total_daily_dose(#[case] tdd: f64, #[case] mode: UnitMode, #[case] isf: f64) {
    assert_eq!(calc_isf_from_tdd(tdd, mode).unwrap(), isf);
}

#[rstest]
#[case(0.0)]
#[case(-10.0)]
#[case(f64::INFINITY)]
#[case(f64::NAN)]
fn isf_from_invalid_tdd_fails(#[case] tdd: f64) {
    let err = calc_isf_from_tdd(tdd, UnitMode::Mmol).expect_err("TDD must be rejected");
    assert!(format!("{err}").contains("TDD must be > 0"));
}

#[rstest]
#[case::small(-0.5)]
#[case::large(-4.0)]
fn negative_iob_counts_as_none(#[case] iob: f64) {
    let c = calc_correction_dose(&CorrectionParams { iob, ..base() }).unwrap();
    assert_eq!(c, calc_correction_dose(&base()).unwrap());
}

#[test]
fn settings_clamp_negative_iob() {
    let p = bolus_core::DosingSettings::default().correction_params(8.0, Some(-4.0));
    assert_eq!(p.iob, 0.0);
    assert_eq!(calc_correction_dose(&p).unwrap().recommended, 1.5);
}

#[rstest]
#[case(f64::NAN)]
#[case(f64::INFINITY)]
fn non_finite_bg_is_invalid(#[case] bg: f64) {
    let err = calc_correction_dose(&CorrectionParams {
        current_bg: bg,
        ..base()
    })
    .expect_err("non-finite BG");
    assert!(matches!(
        err.downcast_ref::<DoseError>(),
        Some(DoseError::InvalidParameter(_))
    ));
}
