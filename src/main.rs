fn main() {
    skilltree::cli::run();
}
