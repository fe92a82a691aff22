use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use jdk_module::config::load_config;
use jdk_module::preflight::check_jdk;
use jdk_module::{describe, executor, JavaModule, JdkConfig, ModuleDescriptor};

const JDKBASE_ENV: &str = "jdkbase";

fn usage() -> &'static str {
    "Usage:\n  jdk-module describe [--jdkbase <path>] [--config <file>]\n  jdk-module stage [--jdkbase <path>] [--config <file>]\n  jdk-module resolve [--jdkbase <path>] [--config <file>]\n\nWithout --jdkbase or --config, the JDK base is read from $jdkbase."
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Options {
    jdkbase: Option<PathBuf>,
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let Some((command, rest)) = args.split_first() else {
        bail!(usage());
    };
    let options = parse_options(rest)?;

    match command.as_str() {
        "describe" => run_describe(&options),
        "stage" => run_stage(&options),
        "resolve" => run_resolve(&options),
        _ => bail!(usage()),
    }
}

fn parse_options(args: &[String]) -> Result<Options> {
    let mut options = Options::default();
    let mut iter = args.iter();
    while let Some(flag) = iter.next() {
        let slot = match flag.as_str() {
            "--jdkbase" => &mut options.jdkbase,
            "--config" => &mut options.config,
            other => bail!("unknown option '{}'\n{}", other, usage()),
        };
        let value = iter
            .next()
            .with_context(|| format!("{flag} expects a value"))?;
        *slot = Some(PathBuf::from(value));
    }
    Ok(options)
}

/// Flag, then config file, then `env` (the value of `$jdkbase`).
fn resolve_jdk(options: &Options, env: Option<OsString>) -> Result<JdkConfig> {
    if let Some(jdkbase) = &options.jdkbase {
        return JdkConfig::new(jdkbase);
    }
    if let Some(config) = &options.config {
        return load_config(config);
    }
    JdkConfig::new(env.unwrap_or_default()).with_context(|| format!("resolving ${JDKBASE_ENV}"))
}

fn build_descriptor(jdk: JdkConfig) -> Result<(PathBuf, ModuleDescriptor)> {
    let cwd = std::env::current_dir().context("resolving current directory")?;
    let module = JavaModule::new(jdk, &cwd);
    let descriptor = describe(&module)?;
    Ok((cwd, descriptor))
}

fn run_describe(options: &Options) -> Result<()> {
    let (_, descriptor) = build_descriptor(resolve_jdk(options, std::env::var_os(JDKBASE_ENV))?)?;
    let json = serde_json::to_string_pretty(&descriptor).context("serializing descriptor")?;
    println!("{json}");
    Ok(())
}

fn run_stage(options: &Options) -> Result<()> {
    let jdk = resolve_jdk(options, std::env::var_os(JDKBASE_ENV))?;
    for warning in check_jdk(&jdk)? {
        eprintln!("[java] warning: {warning}");
    }

    let (root, descriptor) = build_descriptor(jdk)?;
    if !descriptor.requires.is_empty() {
        eprintln!("[java] requires: {}", descriptor.requires.join(", "));
    }
    executor::apply(&root, &descriptor)?;
    eprintln!(
        "[java] staged {} ops under {}",
        descriptor.staging_ops.len(),
        display_root(&root)
    );
    Ok(())
}

fn run_resolve(options: &Options) -> Result<()> {
    let (_, descriptor) = build_descriptor(resolve_jdk(options, std::env::var_os(JDKBASE_ENV))?)?;
    let files = descriptor.usr_files.resolve()?;
    for file in &files {
        println!("{} -> {}", file.source.display(), file.destination);
    }
    eprintln!(
        "[java] {} files from {} rules",
        files.len(),
        descriptor.usr_files.len()
    );
    Ok(())
}

fn display_root(root: &Path) -> String {
    root.join("diskimage").display().to_string()
}
