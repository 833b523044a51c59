fn main() {
    // Device builds need the ESP-IDF build environment propagated; host
    // test builds (no `espidf` feature) skip it.
    if std::env::var_os("CARGO_FEATURE_ESPIDF").is_some() {
        embuild::espidf::sysenv::output();
    }
}
