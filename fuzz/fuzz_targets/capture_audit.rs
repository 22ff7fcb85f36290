#![no_main]

use facade_finder::audit::FacadeAudit;
use facade_finder::classifier::EntityRegistry;
use facade_finder::config::AuditConfig;
use facade_finder::summary::PageCapture;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Any capture that parses must audit without panicking, whatever its
    // URLs or timing values (NaN, negative, missing)
    if let Ok(capture) = serde_json::from_slice::<PageCapture>(data) {
        if let Ok(registry) = EntityRegistry::default_database() {
            let audit = FacadeAudit::new(&registry, AuditConfig::default());
            let _ = audit.run_capture(&capture);
        }
    }
});
