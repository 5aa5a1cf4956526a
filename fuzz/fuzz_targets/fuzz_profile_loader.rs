#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Parse, validate and convert arbitrary profiles; errors are fine, panics are not.
    let Ok(cfg) = toml::from_str::<bolus_config::Config>(data) else {
        return;
    };
    if cfg.validate().is_err() {
        return;
    }
    if let Ok(settings) = bolus_core::DosingSettings::try_from(&cfg) {
        let _ = settings.validate();
    }
});
