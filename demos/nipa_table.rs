use beaapi::{Client, Params};

fn main() -> beaapi::Result<()> {
    // RUST_LOG=beaapi=debug shows each outgoing request (without the API key).
    env_logger::init();

    // Configure authentication via BEA_API_KEY or a `.bearc` file.
    let client = Client::from_env()?;

    let body = client.nipa(
        "2021,2022",
        "Q",
        "T10101",
        Params::new().with("ShowMillions", "N"),
    )?;
    println!("{body}");
    Ok(())
}
