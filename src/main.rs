fn main() {
    plummet::cli::run();
}
