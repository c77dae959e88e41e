//! Global subscriber installation. Runs in its own process so the JSON
//! subscriber it installs never reaches other tests.

use symcrypt::telemetry::init_tracing;

#[test]
fn second_init_is_an_error() {
    assert!(init_tracing("warn").is_ok());
    assert!(init_tracing("warn").is_err());
}
