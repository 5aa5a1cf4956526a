use bolus_core::{
    PenIncrement, SplitPlanParams, build_split_plan, effective_cap, split_into_injections,
};

fn base() -> SplitPlanParams {
    SplitPlanParams {
        total_dose: 10.0,
        pen_increment: PenIncrement::Half,
        max_per_shot: 12.0,
        ..Default::default()
    }
}

#[test]
fn immediate_only() {
    let plan = build_split_plan(&base());
    assert_eq!(plan.injections_now, vec![10.0]);
    assert_eq!(plan.injection_later, None);
    assert_eq!(plan.delay_min, None);
    assert!(plan.notes.is_empty());
}

#[test]
fn staggered_plan_carries_reason() {
    let plan = build_split_plan(&SplitPlanParams {
        stagger_pct: 0.3,
        stagger_delay_min: 90,
        reason: Some("high fat meal".into()),
        ..base()
    });
    assert_eq!(plan.injections_now, vec![7.0]);
    assert_eq!(plan.injection_later, Some(3.0));
    assert_eq!(plan.delay_min, Some(90));
    assert_eq!(
        plan.notes,
        vec!["Staggered 3u at +90 min (high fat meal).".to_string()]
    );
}

#[test]
fn stagger_note_without_reason() {
    let plan = build_split_plan(&SplitPlanParams {
        stagger_pct: 0.5,
        stagger_delay_min: 60,
        ..base()
    });
    assert_eq!(plan.notes, vec!["Staggered 5u at +60 min.".to_string()]);
}

#[test]
fn immediate_part_split_over_cap() {
    let plan = build_split_plan(&SplitPlanParams {
        total_dose: 20.0,
        max_per_shot: 10.0,
        ..base()
    });
    assert_eq!(plan.injections_now, vec![10.0, 10.0]);
    assert_eq!(
        plan.notes,
        vec!["Split due to max 10u per injection for reliable absorption.".to_string()]
    );
}

#[test]
fn zero_and_negative_dose_give_empty_plan() {
    for total in [0.0, -4.0] {
        let plan = build_split_plan(&SplitPlanParams {
            total_dose: total,
            stagger_pct: 0.3,
            stagger_delay_min: 90,
            ..base()
        });
        assert!(plan.injections_now.is_empty());
        assert_eq!(plan.injection_later, None);
        assert_eq!(plan.delay_min, None);
    }
}

#[test]
fn delayed_overflow_moves_to_immediate() {
    let plan = build_split_plan(&SplitPlanParams {
        total_dose: 40.0,
        stagger_pct: 0.5,
        stagger_delay_min: 120,
        ..base()
    });
    assert_eq!(plan.injections_now, vec![10.0, 10.0, 8.0]);
    assert_eq!(plan.injection_later, Some(12.0));
    assert_eq!(plan.delay_min, Some(120));
    assert_eq!(
        plan.notes[0],
        "Delayed dose exceeded 12u cap; moved 8u to the immediate plan."
    );
    assert!(plan.notes.iter().any(|n| n.starts_with("Split due to max 12u")));
    assert!(plan.notes.iter().any(|n| n == "Staggered 12u at +120 min."));
    let total: f64 = plan.immediate_total() + plan.injection_later.unwrap_or(0.0);
    assert_eq!(total, 40.0);
}

#[test]
fn undeliverable_later_part_is_dropped() {
    // 0.2u later rounds to nothing at a 0.5u pen.
    let plan = build_split_plan(&SplitPlanParams {
        total_dose: 2.0,
        stagger_pct: 0.1,
        stagger_delay_min: 60,
        ..base()
    });
    assert_eq!(plan.injections_now, vec![2.0]);
    assert_eq!(plan.injection_later, None);
    assert_eq!(plan.delay_min, None);
    assert!(plan.notes.is_empty());
}

#[test]
fn zero_cap_means_uncapped_for_both_parts() {
    let plan = build_split_plan(&SplitPlanParams {
        max_per_shot: 0.0,
        stagger_pct: 0.3,
        stagger_delay_min: 90,
        ..base()
    });
    assert_eq!(plan.injections_now, vec![7.0]);
    assert_eq!(plan.injection_later, Some(3.0));
    assert_eq!(plan.delay_min, Some(90));
    assert_eq!(plan.notes, vec!["Staggered 3u at +90 min.".to_string()]);
}

#[test]
fn sub_increment_cap_is_reported_as_enforced() {
    let plan = build_split_plan(&SplitPlanParams {
        total_dose: 2.0,
        max_per_shot: 0.2,
        stagger_pct: 0.5,
        stagger_delay_min: 30,
        ..base()
    });
    assert_eq!(plan.injections_now, vec![0.5, 0.5, 0.5]);
    assert_eq!(plan.injection_later, Some(0.5));
    assert!(plan.notes.iter().all(|n| !n.contains("0.2u")));
    assert_eq!(
        plan.notes[0],
        "Delayed dose exceeded 0.5u cap; moved 0.5u to the immediate plan."
    );
    assert!(plan.notes.iter().any(|n| n.starts_with("Split due to max 0.5u")));
}

#[test]
fn plan_and_splitter_agree_on_the_cap() {
    for cap in [0.0, -3.0, f64::NAN, 0.2, 4.0] {
        let plan = build_split_plan(&SplitPlanParams {
            total_dose: 9.0,
            max_per_shot: cap,
            ..base()
        });
        assert_eq!(
            plan.injections_now,
            split_into_injections(9.0, cap, PenIncrement::Half),
            "cap {cap}"
        );
        let enforced = effective_cap(cap, PenIncrement::Half);
        assert!(plan.injections_now.iter().all(|&s| s <= enforced));
    }
}
