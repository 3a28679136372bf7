/**
 * AOT Cleanup CLI - aot-cleanup
 *
 * Lowers framework decorators in TypeScript sources
 */
use std::path::Path;
use std::process;
use std::rc::Rc;

use anyhow::{bail, Context};
use aot_cleanup::{aot_cleanup_transformer, AotCleanupOptions, AotCleanupRun};
use clap::{Arg, ArgAction, ArgMatches, Command};
use tracing_subscriber::EnvFilter;
use ts::{CompilerHost, Printer, Program, SystemHost, TransformationContext, TypeChecker};

fn main() {
    let matches = Command::new("aot-cleanup")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Strip Angular decorators and emit ctorParameters metadata")
        .arg(
            Arg::new("project")
                .short('p')
                .long("project")
                .value_name("PATH")
                .help("Path to tsconfig.json"),
        )
        .arg(
            Arg::new("out-dir")
                .short('o')
                .long("out-dir")
                .value_name("DIR")
                .help("Write lowered files here instead of stdout"),
        )
        .arg(
            Arg::new("no-type-checker")
                .long("no-type-checker")
                .action(ArgAction::SetTrue)
                .help("Classify parameter types without the program's type checker"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Log transformation decisions"),
        )
        .arg(
            Arg::new("files")
                .value_name("FILES")
                .num_args(1..)
                .required(true)
                .help("Source files or glob patterns"),
        )
        .get_matches();

    let default_level = if matches.get_flag("verbose") { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    if let Err(error) = run(&matches) {
        eprintln!("Error: {:#}", error);
        process::exit(1);
    }
}

fn run(matches: &ArgMatches) -> anyhow::Result<()> {
    let files = expand_inputs(matches.get_many::<String>("files").into_iter().flatten())?;
    if files.is_empty() {
        bail!("no input files matched");
    }

    let host: Rc<dyn CompilerHost> = Rc::new(SystemHost);
    let options = AotCleanupOptions {
        ts_config_path: matches.get_one::<String>("project").cloned(),
        ..AotCleanupOptions::default()
    };
    let compiler_options = options.resolve_compiler_options(host.as_ref())?;
    let program = Program::create(&files, compiler_options.clone(), host.as_ref())?;
    let checker: Option<Rc<dyn TypeChecker>> = if matches.get_flag("no-type-checker") {
        None
    } else {
        Some(Rc::new(program.get_type_checker()))
    };

    let mut aot_run = AotCleanupRun::from_options(&options, compiler_options.clone(), Rc::clone(&host))?;
    let printer = Printer::new();
    let out_dir = matches.get_one::<String>("out-dir").map(Path::new);

    for file_name in program.get_root_file_names() {
        let source_file = program
            .get_source_file(file_name)
            .with_context(|| format!("{} was not loaded", file_name))?;
        let mut context = TransformationContext::new(compiler_options.clone());
        if let Some(checker) = &checker {
            context = context.with_type_checker(Rc::clone(checker));
        }

        let transformed = aot_cleanup_transformer(&source_file, &mut context, &mut aot_run)
            .with_context(|| format!("failed to transform {}", file_name))?;
        let output = printer.print_file(&transformed);

        match out_dir {
            Some(dir) => {
                let base_name = Path::new(file_name)
                    .file_name()
                    .with_context(|| format!("{} has no file name", file_name))?;
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("failed to create {}", dir.display()))?;
                let target = dir.join(base_name);
                std::fs::write(&target, output)
                    .with_context(|| format!("failed to write {}", target.display()))?;
                tracing::info!(file = %file_name, output = %target.display(), "wrote lowered file");
            }
            None => print!("{}", output),
        }
    }
    Ok(())
}

/// Glob patterns are expanded; plain paths are taken as given.
fn expand_inputs<'a>(inputs: impl Iterator<Item = &'a String>) -> anyhow::Result<Vec<String>> {
    let mut files = Vec::new();
    for input in inputs {
        if !input.contains(['*', '?', '[']) {
            files.push(input.clone());
            continue;
        }
        for entry in glob::glob(input)? {
            let path = entry?;
            if path.is_file() {
                files.push(path.to_string_lossy().into_owned());
            }
        }
    }
    Ok(files)
}
