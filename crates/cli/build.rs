use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let completions_dir = out_dir.join("completions");

    fs::create_dir_all(&completions_dir).unwrap();

    let mut cmd = clap::Command::new("lacuna")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Lacuna Contributors")
        .about("Turn Wikipedia pages into cloze exercises")
        .arg(clap::arg!(<INPUT> "Wikipedia URL, local HTML file, or '-' for stdin"))
        .arg(
            clap::arg!(-c --class <CLASS> "Word class to remove")
                .default_value("articles")
                .value_parser(["articles", "prepositions", "pronouns", "random"]),
        )
        .arg(clap::arg!(-l --language <CODE> "Page language; required for file and stdin input"))
        .arg(
            clap::arg!(--tables <DIR> "Lookup table directory")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            clap::arg!(-o --output <FILE> "Output file (default: stdout)")
                .value_name("FILE")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            clap::arg!(-f --format <FORMAT> "Output format (html, json)")
                .value_name("FORMAT")
                .default_value("html")
                .value_parser(["html", "json"]),
        )
        .arg(clap::arg!(--seed <N> "Seed for random word removal"))
        .arg(clap::arg!(--timeout <SECS> "HTTP timeout in seconds").default_value("30"))
        .arg(clap::arg!(--user_agent <UA> "Custom User-Agent for HTTP requests").value_name("UA"))
        .arg(clap::arg!(-v --verbose "Enable debug logging"));

    clap_complete::generate_to(clap_complete::shells::Bash, &mut cmd, "lacuna", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Zsh, &mut cmd, "lacuna", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Fish, &mut cmd, "lacuna", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::PowerShell, &mut cmd, "lacuna", &completions_dir).unwrap();

    println!(
        "cargo:warning=Shell completions generated in: {}",
        completions_dir.display()
    );
}
