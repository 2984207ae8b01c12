fn main() -> std::process::ExitCode {
    fillbench::run()
}
