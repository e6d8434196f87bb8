fn main() {
    std::process::exit(leiserchess::uci::run());
}
