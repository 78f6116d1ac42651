fn main() {
    // ESP-IDF environment is only needed when building the firmware image.
    // Host builds (tests, simulation) skip it entirely.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
