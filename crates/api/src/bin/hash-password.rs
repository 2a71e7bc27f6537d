//! Password hashing utility for Gatehouse
//!
//! Generates Argon2id password hashes for storage in the users table. Useful
//! for seeding an admin account without exposing a plaintext password to the
//! running service.
//!
//! Usage:
//!   cargo run --bin hash-password
//!   cargo run --bin hash-password "MySecurePassword123!"

use std::env;
use std::io::{self, Write};

use gatehouse_api::auth::{hash_password, validate_new_password};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let password = if let Some(pwd) = env::args().nth(1) {
        pwd
    } else {
        // Reading from stdin keeps the password out of the process list
        print!("Enter password to hash: ");
        io::stdout().flush()?;

        let mut password = String::new();
        io::stdin().read_line(&mut password)?;
        password.trim().to_string()
    };

    if let Err(e) = validate_new_password(&password) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    let password_hash = hash_password(&password)?;

    println!("\n{password_hash}\n");
    println!("Store this value in the password_hash column of the users table:");
    println!("UPDATE users SET password_hash = '{password_hash}' WHERE email = 'admin@example.com';");

    Ok(())
}
