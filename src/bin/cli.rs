fn main() {
    #[cfg(feature = "cli")]
    outpost::logger::init_logging("logs/outpost.log", "info");
    outpost::uci::run();
}
