//! `pag-off` - interact with your pagure project's tickets offline.
//!
//! Tickets are read from a local clone of the project's ticket repository;
//! every change is confirmed interactively and committed on its own.

use pag_off::{EXIT_INTERRUPTED, exit_code, run};

fn main() {
    if let Err(e) = run() {
        let code = exit_code(&e);
        if code == EXIT_INTERRUPTED {
            println!("\nInterrupted by user.");
        } else {
            eprintln!("Error: {e}");
        }
        std::process::exit(code);
    }
}
