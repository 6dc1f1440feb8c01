use std::env;
use std::path::PathBuf;

pub struct CliOptions {
    pub project: Option<PathBuf>,
    pub preset: Option<String>,
    pub config: Option<PathBuf>,
    pub csv_out: Option<PathBuf>,
    pub export_out: Option<PathBuf>,
    pub store: Option<PathBuf>,
    pub user: Option<String>,
}

pub fn parse_args() -> Result<CliOptions, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(args)
}

fn parse_args_from(args: Vec<String>) -> Result<CliOptions, String> {
    if args.len() == 1 && (args[0] == "--help" || args[0] == "-h") {
        print_usage();
        std::process::exit(0);
    }
    parse_options(&args)
}

fn parse_options(args: &[String]) -> Result<CliOptions, String> {
    let mut i = 0usize;
    let mut opts = CliOptions {
        project: None,
        preset: None,
        config: None,
        csv_out: None,
        export_out: None,
        store: None,
        user: None,
    };

    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--project" | "--config" | "--csv-out" | "--export-out" | "--store" => {
                i += 1;
                let path = PathBuf::from(args.next_or_err(
                    i,
                    &format!("missing value for {flag} (expected a file path)"),
                )?);
                let slot = match flag {
                    "--project" => &mut opts.project,
                    "--config" => &mut opts.config,
                    "--csv-out" => &mut opts.csv_out,
                    "--export-out" => &mut opts.export_out,
                    _ => &mut opts.store,
                };
                if slot.replace(path).is_some() {
                    return Err(format!("{flag} provided more than once"));
                }
            }
            "--preset" => {
                i += 1;
                let name =
                    args.next_or_err(i, "missing value for --preset (expected a preset name)")?;
                if opts.preset.replace(name.to_string()).is_some() {
                    return Err("--preset provided more than once".to_string());
                }
            }
            "--user" => {
                i += 1;
                let name = args.next_or_err(i, "missing value for --user (expected a name)")?;
                if opts.user.replace(name.to_string()).is_some() {
                    return Err("--user provided more than once".to_string());
                }
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    if opts.project.is_some() && opts.preset.is_some() {
        return Err(
            "arguments `--project` and `--preset` are mutually exclusive; choose one source"
                .to_string(),
        );
    }

    if opts.project.is_none() && opts.preset.is_none() {
        opts.preset = Some("residential".to_string());
    }

    Ok(opts)
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("pv-designer - size a photovoltaic installation and report warnings");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  pv-designer [--project <path> | --preset <name>] [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --project <path>      Load a project snapshot (JSON)");
    eprintln!("  --preset <name>       Use a built-in project (empty, residential, oversized)");
    eprintln!("  --config <path>       Load designer configuration from TOML");
    eprintln!("  --csv-out <path>      Write the monthly production estimate as CSV");
    eprintln!("  --export-out <path>   Write the exported project snapshot as JSON");
    eprintln!("  --store <dir>         Save the project into a JSON project directory");
    eprintln!("  --user <name>         Sign in as <name> before saving");
    eprintln!("  --help                Show this help message");
    eprintln!();
    eprintln!("If no --project or --preset is given, the residential preset is used.");
}
