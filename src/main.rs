fn main() {
    std::process::exit(lichen::app::startup::startup());
}
