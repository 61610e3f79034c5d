fn main() {
    unmerged_cleaner::app::cli::run();
}
