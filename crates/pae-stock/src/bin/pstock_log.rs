//! pstock-log - Show the movement log of a product.

fn main() -> std::process::ExitCode {
    pae_stock::cmd::log_cmd::main()
}
