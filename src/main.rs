//! Enigma Emulator - CLI Entry Point
//!
//! Commands:
//! - `enigma-emu process <text>` - Encrypt or decrypt text
//! - `enigma-emu steps` - Show the rotor windows key press by key press
//! - `enigma-emu sheet` - Write a key sheet JSON file
//! - `enigma-emu lamp` - Interactive lampboard
//! - `enigma-emu catalog` - List rotor and reflector types
//! - `enigma-emu test` - Built-in self-test

use clap::{Args, Parser, Subcommand};
use enigma::telemetry::{self, LogFormat};
use enigma::{KeySheet, Machine, RotorCatalog};

#[derive(Parser)]
#[command(name = "enigma-emu")]
#[command(author = "Yigit")]
#[command(version = "0.1.0")]
#[command(about = "An emulator of the Enigma rotor cipher machine")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv every key press)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Log line format
    #[arg(long, value_enum, default_value_t = LogFormat::Compact, global = true)]
    log_format: LogFormat,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt or decrypt text (the same operation on an Enigma)
    Process {
        /// Text to process; read from stdin if omitted. Spaces are ignored.
        text: Option<String>,
        #[command(flatten)]
        setup: SetupArgs,
        /// Print output in groups of this many letters (0 for none)
        #[arg(short, long, default_value = "5")]
        groups: usize,
    },
    /// Press a key repeatedly and show the rotor windows after each press
    Steps {
        #[command(flatten)]
        setup: SetupArgs,
        /// Number of key presses
        #[arg(short, long, default_value = "26")]
        count: usize,
    },
    /// Write the machine setup to a key sheet JSON file
    Sheet {
        #[command(flatten)]
        setup: SetupArgs,
        /// Output file
        #[arg(short, long)]
        output: String,
    },
    /// Interactive lampboard
    Lamp {
        #[command(flatten)]
        setup: SetupArgs,
    },
    /// List the rotor and reflector types in the catalog
    Catalog {
        /// Load a custom catalog JSON file instead of the historical one
        #[arg(long)]
        catalog: Option<String>,
    },
    /// Run the built-in self-test
    Test,
}

/// Machine setup, either from a key sheet file or from flags.
#[derive(Args)]
struct SetupArgs {
    /// Key sheet JSON file (replaces the flags below)
    #[arg(short, long)]
    sheet: Option<String>,
    /// Custom rotor catalog JSON file
    #[arg(long)]
    catalog: Option<String>,
    /// Rotor types, leftmost first
    #[arg(short, long, default_value = "I II III")]
    rotors: String,
    /// Ring settings, 0-25, leftmost first (e.g. "1 20 11")
    #[arg(long, default_value = "")]
    rings: String,
    /// Reflector type
    #[arg(long, default_value = "B")]
    reflector: String,
    /// Plugboard settings ("AV BS CG" or "1/22 2/19 3/7")
    #[arg(short, long, default_value = "")]
    plugboard: String,
    /// Starting rotor window letters
    #[arg(short, long)]
    display: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    telemetry::init(cli.verbose, cli.log_format);

    match cli.command {
        Some(Commands::Process { text, setup, groups }) => {
            process(text, &setup, groups);
        }
        Some(Commands::Steps { setup, count }) => {
            show_steps(&setup, count);
        }
        Some(Commands::Sheet { setup, output }) => {
            write_sheet(&setup, &output);
        }
        Some(Commands::Lamp { setup }) => {
            lampboard(&setup);
        }
        Some(Commands::Catalog { catalog }) => {
            list_catalog(catalog.as_deref());
        }
        Some(Commands::Test) => {
            run_self_test();
        }
        None => {
            println!("Enigma Emulator v0.1.0");
            println!("Enigma I / M3 / M4 rotor cipher machine");
            println!();
            println!("Use --help for available commands");
            println!();
            demo_message();
        }
    }
}

fn load_catalog(path: Option<&str>) -> RotorCatalog {
    match path {
        Some(path) => match enigma::data::load_catalog(path) {
            Ok(catalog) => catalog,
            Err(e) => {
                eprintln!("❌ Failed to load catalog: {}", e);
                std::process::exit(1);
            }
        },
        None => RotorCatalog::historical(),
    }
}

fn build_machine(setup: &SetupArgs) -> Machine {
    let catalog = load_catalog(setup.catalog.as_deref());

    let mut sheet = match &setup.sheet {
        Some(path) => match enigma::load_key_sheet(path) {
            Ok(sheet) => sheet,
            Err(e) => {
                eprintln!("❌ Failed to load key sheet: {}", e);
                std::process::exit(1);
            }
        },
        None => {
            let ring_settings = match setup
                .rings
                .split_whitespace()
                .map(str::parse::<i32>)
                .collect::<Result<Vec<_>, _>>()
            {
                Ok(rings) => rings,
                Err(e) => {
                    eprintln!("❌ Invalid ring settings {:?}: {}", setup.rings, e);
                    std::process::exit(1);
                }
            };
            KeySheet {
                rotors: setup.rotors.split_whitespace().map(str::to_string).collect(),
                ring_settings,
                reflector: setup.reflector.clone(),
                plugboard: setup.plugboard.clone(),
                display: None,
            }
        }
    };
    if setup.display.is_some() {
        sheet.display = setup.display.clone();
    }

    match sheet.build(&catalog) {
        Ok(machine) => {
            tracing::info!(machine = %machine, "machine ready");
            machine
        }
        Err(e) => {
            eprintln!("❌ Invalid machine setup: {}", e);
            std::process::exit(1);
        }
    }
}

fn process(text: Option<String>, setup: &SetupArgs, groups: usize) {
    use enigma::alpha::{group_text, remove_spaces};
    use std::io::Read;

    let mut machine = build_machine(setup);

    let text = match text {
        Some(t) => t,
        None => {
            let mut buf = String::new();
            if let Err(e) = std::io::stdin().read_to_string(&mut buf) {
                eprintln!("❌ Failed to read stdin: {}", e);
                std::process::exit(1);
            }
            buf
        }
    };

    match machine.process_text(&remove_spaces(&text)) {
        Ok(out) => println!("{}", group_text(&out, groups)),
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }
}

fn show_steps(setup: &SetupArgs, count: usize) {
    let mut machine = build_machine(setup);

    println!("━━━ Stepping ━━━");
    println!("start: {}", machine.get_display());
    for i in 1..=count {
        let lamp = machine.step(0);
        println!("{:>5}: {}  (A -> {})", i, machine.get_display(), enigma::signal_to_letter(lamp));
    }
}

fn write_sheet(setup: &SetupArgs, output: &str) {
    let machine = build_machine(setup);
    let sheet = KeySheet::from_machine(&machine);

    if let Err(e) = enigma::save_key_sheet(output, &sheet) {
        eprintln!("❌ Failed to save key sheet: {}", e);
        std::process::exit(1);
    }

    println!("✓ Saved {} to {}", machine, output);
}

#[cfg(feature = "tui")]
fn lampboard(setup: &SetupArgs) {
    let machine = build_machine(setup);
    if let Err(e) = enigma::run_lampboard(machine) {
        eprintln!("❌ Lampboard error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "tui"))]
fn lampboard(_setup: &SetupArgs) {
    eprintln!("❌ Built without the `tui` feature");
    std::process::exit(1);
}

fn list_catalog(path: Option<&str>) {
    let catalog = load_catalog(path);

    println!("━━━ Rotors ━━━");
    for name in catalog.rotor_names() {
        if let Some(spec) = catalog.rotor_spec(name) {
            println!(
                "  {:<6} {}  notches: {}",
                name,
                spec.wiring,
                spec.stepping.as_deref().unwrap_or("-")
            );
        }
    }
    println!();
    println!("━━━ Reflectors ━━━");
    for name in catalog.reflector_names() {
        println!("  {:<6} {}", name, catalog.reflector_wiring(name).unwrap_or(""));
    }
}

/// Decrypt a short Heer message: the message key first, then the body.
fn demo_message() {
    println!("━━━ Demo: a Heer message ━━━");
    println!();

    let catalog = RotorCatalog::historical();
    let mut machine = match Machine::from_key_sheet(
        &catalog,
        &["II", "IV", "V"],
        &[1, 20, 11],
        "B",
        "AV BS CG DL FU HZ IN KM OW RX",
    ) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };
    println!("Key sheet:        {}", machine);

    let result = machine
        .set_display("WXC")
        .and_then(|_| machine.process_text("KCH"))
        .and_then(|key| {
            println!("Message key:      KCH at WXC -> {}", key);
            machine.set_display(&key)?;
            machine.process_text("NIBLFMYMLLUFWCASCSSNVHAZ")
        });

    match result {
        Ok(plain) => {
            println!("Ciphertext:       NIBLF MYMLL UFWCA SCSSN VHAZ");
            println!("Plaintext:        {}", enigma::alpha::group_text(&plain, 5));
        }
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }
}

fn run_self_test() {
    use enigma::Plugboard;

    println!("━━━ Enigma Emulator Self-Test ━━━");
    println!();

    let catalog = RotorCatalog::historical();
    let mut passed = 0;
    let mut failed = 0;

    // Test 1: floor modulo
    print!("Floor modulo on negatives... ");
    if enigma::alpha_mod(-1) == 25 && enigma::alpha_mod(-27) == 25 && enigma::alpha_mod(26) == 0 {
        println!("✓"); passed += 1;
    } else {
        println!("✗"); failed += 1;
    }

    // Test 2: rotor bijection
    print!("Rotor signal_out undoes signal_in... ");
    let mut ok = true;
    for name in ["I", "VI", "Beta"] {
        for ring in 0..26 {
            let Ok(mut rotor) = catalog.create_rotor(name, ring) else {
                ok = false;
                continue;
            };
            for _ in 0..26 {
                ok &= (0..26).all(|x| rotor.signal_out(rotor.signal_in(x)) == x);
                rotor.rotate();
            }
        }
    }
    if ok { println!("✓"); passed += 1; }
    else { println!("✗"); failed += 1; }

    // Test 3: double step
    print!("Middle rotor double step... ");
    let steps = Machine::from_key_sheet(&catalog, &["III", "II", "I"], &[], "B", "")
        .and_then(|mut m| {
            m.set_display("KDO")?;
            Ok((0..6)
                .map(|_| {
                    m.step(0);
                    m.get_display()
                })
                .collect::<Vec<_>>())
        });
    match steps {
        Ok(s) if s == ["KDP", "KDQ", "KER", "LFS", "LFT", "LFU"] => {
            println!("✓");
            passed += 1;
        }
        other => {
            println!("✗ (got {:?})", other);
            failed += 1;
        }
    }

    // Test 4: known answer
    print!("Known answer AAAAA -> BDZGO... ");
    let cipher = Machine::from_key_sheet(&catalog, &["I", "II", "III"], &[], "B", "")
        .and_then(|mut m| m.process_text("AAAAA"));
    match cipher.as_deref() {
        Ok("BDZGO") => {
            println!("✓");
            passed += 1;
        }
        other => {
            println!("✗ (got {:?}, expected BDZGO)", other);
            failed += 1;
        }
    }

    // Test 5: plugboard rules
    print!("Plugboard rejects 11 cables and duplicates... ");
    let eleven = Plugboard::from_settings("AB CD EF GH IJ KL MN OP QR ST UV");
    let duplicate = Plugboard::from_settings("AB CD EF GH IJ KL MN OF");
    if eleven.is_err() && duplicate.is_err() {
        println!("✓");
        passed += 1;
    } else {
        println!("✗");
        failed += 1;
    }

    // Test 6: ring setting bounds
    print!("Ring settings 0 and 25 valid, -1 and 26 rejected... ");
    let bounds = [0, 25, -1, 26].map(|r| catalog.create_rotor("I", r).is_ok());
    if bounds == [true, true, false, false] {
        println!("✓");
        passed += 1;
    } else {
        println!("✗ (got {:?})", bounds);
        failed += 1;
    }

    println!();
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Results: {} passed, {} failed", passed, failed);

    if failed == 0 {
        println!("✓ All tests passed!");
    } else {
        std::process::exit(1);
    }
}
