use std::process::Command;

fn main() {
    // CHATMATE_VERSION from the environment wins (release builds); otherwise
    // ask git for a description of the checkout.
    if let Ok(version) = std::env::var("CHATMATE_VERSION") {
        println!("cargo:rustc-env=CHATMATE_VERSION={version}");
    } else if let Ok(output) = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        && output.status.success()
    {
        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !version.is_empty() {
            println!("cargo:rustc-env=CHATMATE_VERSION={version}");
        }
    }

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");
    println!("cargo:rerun-if-changed=chatmates");
    println!("cargo:rerun-if-env-changed=CHATMATE_VERSION");
}
