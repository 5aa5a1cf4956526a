use bolus_core::{
    DoseInputs, DosingSettings, FoodTag, Meal, PenIncrement, calc_meal_dose, split_into_injections,
};
use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};

// Deterministic spread of meals: carbs 0..250 g, BG 4..20 mmol/L
fn synth_meals(n: usize, seed: u32) -> Vec<DoseInputs> {
    let mut state = seed.max(1);
    let mut next_f64 = || {
        let mut x = state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        state = x;
        f64::from(x) / (f64::from(u32::MAX) + 1.0)
    };
    (0..n)
        .map(|i| {
            let meal = Meal::ALL[i % Meal::ALL.len()];
            let mut d = DoseInputs::new(meal, next_f64() * 250.0, 4.0 + next_f64() * 16.0);
            d.iob = Some(next_f64() * 3.0);
            d.high_fat_protein = Some(i % 3 == 0);
            if i % 5 == 0 {
                d.tags.push(FoodTag::LowGi);
            }
            d
        })
        .collect()
}

pub fn bench_meal_dose(c: &mut Criterion) {
    let mut g = c.benchmark_group("meal_dose");
    //   BENCH_SAMPLE_SIZE=10 BENCH_MEAS_MS=50 cargo bench -p bolus_core --bench meal_dose
    if let Ok(ss) = std::env::var("BENCH_SAMPLE_SIZE") {
        if let Ok(n) = ss.parse::<usize>() {
            g.sample_size(n.max(1));
        }
    } else {
        g.sample_size(50);
    }
    if let Ok(ms) = std::env::var("BENCH_MEAS_MS")
        && let Ok(ms_u64) = ms.parse::<u64>()
    {
        g.measurement_time(std::time::Duration::from_millis(ms_u64));
    }

    let settings = DosingSettings::default();
    let meals = synth_meals(1_000, 0xC0FFEE);

    g.bench_function("calc_meal_dose_1k", |b| {
        b.iter_batched(
            || meals.clone(),
            |ms| {
                for d in &ms {
                    let _ = black_box(calc_meal_dose(black_box(&settings), d));
                }
            },
            BatchSize::SmallInput,
        )
    });

    for &inc in &[PenIncrement::Half, PenIncrement::Whole] {
        g.bench_function(format!("split_{inc}"), |b| {
            b.iter(|| black_box(split_into_injections(black_box(73.3), black_box(6.0), inc)));
        });
    }
    g.finish();
}

criterion_group!(meal_dose, bench_meal_dose);
criterion_main!(meal_dose);
