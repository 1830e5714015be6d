//! pstock-snapshot - Show the current FIFO stock of a product.

fn main() -> std::process::ExitCode {
    pae_stock::cmd::snapshot_cmd::main()
}
