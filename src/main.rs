use clap::{Arg, ArgAction, ArgMatches, Command};
use log::LevelFilter;
use qr_shield::config::{load_config_or_default, Config, OutputFormat};
use qr_shield::history::{HistoryFilter, HistoryStore, HistorySummary, JsonFileHistory};
use qr_shield::{AnalysisResult, ThreatLevel, UrlAnalyzer};
use std::io::{self, BufRead};
use std::process;

fn main() {
    let matches = build_cli().get_matches();

    if let Some(generate_path) = matches.get_one::<String>("generate-config") {
        generate_default_config(generate_path);
        return;
    }

    let verbose = matches.get_flag("verbose");
    let config_path = matches
        .get_one::<String>("config")
        .map(String::as_str)
        .unwrap_or("qr-shield.yaml");
    let config = load_config_or_default(config_path);

    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        config.log_level().unwrap_or(LevelFilter::Info)
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    let format = match matches.get_one::<String>("format") {
        Some(value) => parse_or_exit::<OutputFormat>(value),
        None => config.output.format,
    };

    let fail_on = match matches.get_one::<String>("fail-on") {
        Some(value) => Some(parse_or_exit::<ThreatLevel>(value)),
        None => config.output.fail_on,
    };

    let history_path = matches
        .get_one::<String>("history")
        .cloned()
        .unwrap_or_else(|| config.history.path.clone());

    let listing_history = wants_history_listing(&matches);

    let mut history = if listing_history
        || (config.history.enabled && !matches.get_flag("no-history"))
    {
        match JsonFileHistory::open(&history_path, config.history.max_entries) {
            Ok(history) => Some(history),
            Err(e) => {
                eprintln!("❌ Failed to open history: {e:#}");
                process::exit(1);
            }
        }
    } else {
        None
    };

    if listing_history {
        if let Some(store) = history.as_mut() {
            handle_history_commands(&matches, store, format);
        }
        return;
    }

    let inputs: Vec<String> = match matches.get_many::<String>("urls") {
        Some(urls) => urls.cloned().collect(),
        None => read_stdin_inputs(),
    };

    if inputs.is_empty() {
        eprintln!("❌ No URLs given. Pass URLs as arguments or pipe them on stdin.");
        process::exit(1);
    }

    let analyzer = UrlAnalyzer::new();
    let mut results = Vec::with_capacity(inputs.len());

    for input in &inputs {
        let result = analyzer.analyze(input);

        if let Some(store) = history.as_mut() {
            if let Err(e) = store.append(result.clone()) {
                log::warn!("Failed to record history entry: {e:#}");
            }
        }

        if format == OutputFormat::Text {
            print_result(&result);
            if verbose {
                print_breakdown(&analyzer, input);
            }
            println!();
        }
        results.push(result);
    }

    if format == OutputFormat::Json {
        print_json(&results);
    }

    if let Some(threshold) = fail_on {
        if results.iter().any(|r| r.threat_level >= threshold) {
            process::exit(2);
        }
    }
}

fn build_cli() -> Command {
    Command::new("qr-shield")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Offline threat scoring for URLs decoded from QR codes or typed by hand")
        .arg(
            Arg::new("urls")
                .value_name("URL")
                .help("URLs to analyze (reads one per line from stdin when omitted)")
                .num_args(0..)
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("qr-shield.yaml"),
        )
        .arg(
            Arg::new("generate-config")
                .long("generate-config")
                .value_name("FILE")
                .help("Generate a default configuration file")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .value_name("FORMAT")
                .help("Output format (text, json)")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("history")
                .long("history")
                .value_name("FILE")
                .help("History file (overrides the configured path)")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("no-history")
                .long("no-history")
                .help("Do not record results in the history file")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("show-history")
                .long("show-history")
                .help("List past results, newest first")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("level")
                .long("level")
                .value_name("TIER")
                .help("List history entries of this tier (safe, suspicious, malicious)")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("search")
                .long("search")
                .value_name("TEXT")
                .help("List history entries whose URL or domain contains TEXT")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("clear-history")
                .long("clear-history")
                .help("Delete all history entries and exit")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("stats")
                .long("stats")
                .help("Show a summary of the history by threat tier")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("fail-on")
                .long("fail-on")
                .value_name("TIER")
                .help("Exit with status 2 when any result reaches this tier")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable debug logging and per-detector score breakdown")
                .action(ArgAction::SetTrue),
        )
}

/// History filters on their own imply a listing rather than a scan
fn wants_history_listing(matches: &ArgMatches) -> bool {
    matches.get_flag("show-history")
        || matches.get_flag("stats")
        || matches.get_flag("clear-history")
        || matches.get_one::<String>("level").is_some()
        || matches.get_one::<String>("search").is_some()
}

fn parse_or_exit<T>(value: &str) -> T
where
    T: std::str::FromStr<Err = anyhow::Error>,
{
    match value.parse::<T>() {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("❌ {e}");
            process::exit(1);
        }
    }
}

fn read_stdin_inputs() -> Vec<String> {
    let stdin = io::stdin();
    let mut inputs = Vec::new();
    for line in stdin.lock().lines() {
        match line {
            Ok(line) if !line.trim().is_empty() => inputs.push(line),
            Ok(_) => {}
            Err(e) => {
                log::warn!("Stopped reading stdin: {e}");
                break;
            }
        }
    }
    inputs
}

fn handle_history_commands(
    matches: &ArgMatches,
    store: &mut JsonFileHistory,
    format: OutputFormat,
) {
    if matches.get_flag("clear-history") {
        match store.clear() {
            Ok(()) => println!("✅ History cleared ({})", store.path().display()),
            Err(e) => {
                eprintln!("❌ Failed to clear history: {e:#}");
                process::exit(1);
            }
        }
        return;
    }

    let entries = match store.list() {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("❌ Failed to read history: {e:#}");
            process::exit(1);
        }
    };

    let filter = HistoryFilter {
        level: matches
            .get_one::<String>("level")
            .map(|value| parse_or_exit::<ThreatLevel>(value)),
        query: matches.get_one::<String>("search").cloned(),
    };
    let entries = filter.apply(entries);

    if matches.get_flag("stats") {
        let summary = HistorySummary::from_results(&entries);
        match format {
            OutputFormat::Json => print_json(&summary),
            OutputFormat::Text => print_summary(&summary),
        }
        return;
    }

    match format {
        OutputFormat::Json => print_json(&entries),
        OutputFormat::Text => {
            if entries.is_empty() {
                println!("📭 No history entries");
                return;
            }
            println!("📜 Scan history ({} entries, newest first)", entries.len());
            println!("═══════════════════════════════════════");
            for entry in &entries {
                println!(
                    "  {} {:<10} {:>3}  {}  {}",
                    tier_icon(entry.threat_level),
                    entry.threat_level.as_str().to_uppercase(),
                    entry.risk_score,
                    entry.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
                    truncate_string(&entry.url, 60)
                );
            }
        }
    }
}

fn print_result(result: &AnalysisResult) {
    let details = &result.details;

    println!("{} {}", tier_icon(result.threat_level), result.url);
    println!(
        "  Threat level: {} (risk score {}/100)",
        result.threat_level.as_str().to_uppercase(),
        result.risk_score
    );
    println!("  Threats:");
    for threat in &result.threats {
        println!("    • {threat}");
    }
    println!("  Details:");
    println!("    Domain:               {}", details.domain);
    println!("    Protocol:             {}", details.protocol);
    println!("    Path:                 {}", details.path);
    println!("    IP address host:      {}", yes_no(details.has_ip_address));
    println!("    URL shortener:        {}", yes_no(details.is_shortened));
    println!("    Suspicious extension: {}", yes_no(details.has_suspicious_extension));
    println!("    Phishing keywords:    {}", yes_no(details.has_phishing_keywords));
    println!("    Excessive subdomains: {}", yes_no(details.has_excessive_subdomains));
    println!("    Encoded characters:   {}", yes_no(details.has_encoded_characters));
    println!("    Non-standard port:    {}", yes_no(details.has_port_number));
    println!("    Suspicious patterns:  {}", yes_no(details.has_suspicious_patterns));
    println!("    Redirect parameters:  {}", yes_no(details.has_redirects));
    println!(
        "  Scanned: {}",
        result.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    );

    if result.threat_level.allows_navigation() {
        println!("  ✅ Safe to open or copy");
    } else {
        println!("  🚫 Opening and copying disabled for this URL");
    }
}

fn print_breakdown(analyzer: &UrlAnalyzer, input: &str) {
    match analyzer.explain(input) {
        Some(breakdown) if !breakdown.is_empty() => {
            println!("  Score breakdown:");
            for contribution in breakdown {
                println!(
                    "    +{:<3} {}",
                    contribution.weight,
                    contribution.detector.name()
                );
            }
        }
        Some(_) => println!("  Score breakdown: no detectors triggered"),
        None => println!("  Score breakdown: unparseable input scored at maximum"),
    }
}

fn print_summary(summary: &HistorySummary) {
    println!("📊 Scan Statistics");
    println!("═══════════════════════════════════════");
    println!("  Total Scans: {}", summary.total_scans);
    if summary.total_scans > 0 {
        let pct = |count: usize| count as f64 / summary.total_scans as f64 * 100.0;
        println!("  ├─ Safe: {} ({:.1}%)", summary.safe, pct(summary.safe));
        println!(
            "  ├─ Suspicious: {} ({:.1}%)",
            summary.suspicious,
            pct(summary.suspicious)
        );
        println!(
            "  └─ Malicious: {} ({:.1}%)",
            summary.malicious,
            pct(summary.malicious)
        );
        println!("  Average Risk Score: {:.1}", summary.average_risk_score);
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("❌ Failed to serialize output: {e}");
            process::exit(1);
        }
    }
}

fn generate_default_config(path: &str) {
    match Config::default().to_file(path) {
        Ok(()) => println!("✅ Default configuration written to: {path}"),
        Err(e) => {
            eprintln!("❌ Failed to write configuration: {e:#}");
            process::exit(1);
        }
    }
}

fn tier_icon(level: ThreatLevel) -> &'static str {
    match level {
        ThreatLevel::Safe => "✅",
        ThreatLevel::Suspicious => "⚠️",
        ThreatLevel::Malicious => "🛑",
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{truncated}...")
    }
}
