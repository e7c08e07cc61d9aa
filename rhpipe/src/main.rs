use clap::{Arg, ArgAction, ArgMatches, Command};
use log::{info, warn};
use retrohost::{
    conf::ConfigFile,
    cpu,
    dylib::NativeLoader,
    filter::{FilterGraph, FilterRegistry, FilterSource},
    format::PixelFormat,
    frame::VideoFrame,
    host::NullHost,
    session::Session,
    settings::Settings,
};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

mod output;
mod progress;

use output::OutputWriter;
use progress::ProgressTracker;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = Command::new("rhpipe")
        .version("0.1.0")
        .disable_version_flag(true)
        .about("libretro core runner using retrohost")
        .arg_required_else_help(true)
        .arg(
            Arg::new("version")
                .short('v')
                .long("version")
                .help("Show version info and exit")
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("info")
                .about("Print a core's metadata and exit")
                .arg(Arg::new("core").help("libretro core library").required(true).index(1)),
        )
        .subcommand(
            Command::new("filters")
                .about("List the available softfilters")
                .arg(filter_dir_arg()),
        )
        .subcommand(
            Command::new("run")
                .about("Run a core and write the frames it renders")
                .arg(Arg::new("core").help("libretro core library").required(true).index(1))
                .arg(
                    Arg::new("outfile")
                        .help("Output file (use '-' for stdout, '--' for no output)")
                        .required(true)
                        .index(2),
                )
                .arg(Arg::new("content").help("Content to load").index(3))
                .arg(
                    Arg::new("frames")
                        .short('n')
                        .long("frames")
                        .help("Number of frames to run")
                        .value_name("N")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("60"),
                )
                .arg(
                    Arg::new("filter-config")
                        .short('f')
                        .long("filter-config")
                        .help("Softfilter config file; its 'filter' key selects the filter")
                        .value_name("FILE"),
                )
                .arg(filter_dir_arg())
                .arg(
                    Arg::new("system-dir")
                        .long("system-dir")
                        .help("Directory cores read BIOS files from")
                        .value_name("DIR"),
                )
                .arg(
                    Arg::new("save-dir")
                        .long("save-dir")
                        .help("Directory cores write saves to")
                        .value_name("DIR"),
                )
                .arg(
                    Arg::new("options")
                        .long("options")
                        .help("Core options file")
                        .value_name("FILE"),
                )
                .arg(
                    Arg::new("container")
                        .short('c')
                        .long("container")
                        .help("Add headers for the specified format to the output")
                        .value_name("FORMAT")
                        .value_parser(["ppm"]),
                )
                .arg(
                    Arg::new("progress")
                        .short('p')
                        .long("progress")
                        .help("Print progress to stderr")
                        .action(ArgAction::SetTrue),
                ),
        )
        .get_matches();

    if matches.get_flag("version") {
        println!("rhpipe 0.1.0 (libretro API {})", retrohost::api_version());
        return;
    }

    match matches.subcommand() {
        Some(("info", sub)) => print_core_info(Path::new(required(sub, "core"))),
        Some(("filters", sub)) => print_filters(&filter_source(sub)),
        Some(("run", sub)) => run(sub),
        _ => fail("rhpipe", "a subcommand is required (info, filters or run)"),
    }
}

fn filter_dir_arg() -> Arg {
    Arg::new("filter-dir")
        .short('d')
        .long("filter-dir")
        .help("Load softfilter plugins from this directory instead of the built-in filters")
        .value_name("DIR")
}

fn required<'a>(matches: &'a ArgMatches, id: &str) -> &'a str {
    matches
        .get_one::<String>(id)
        .map(String::as_str)
        .unwrap_or_else(|| unreachable!("clap enforces required argument {}", id))
}

fn filter_source(matches: &ArgMatches) -> FilterSource {
    matches
        .get_one::<String>("filter-dir")
        .map(|dir| FilterSource::Directory(PathBuf::from(dir)))
        .unwrap_or_default()
}

fn fail(what: &str, e: impl std::fmt::Display) -> ! {
    eprintln!("{}: {}", what, e);
    process::exit(1);
}

fn print_core_info(core: &Path) {
    let info = retrohost::core::probe(&NativeLoader, core, true)
        .unwrap_or_else(|e| fail("Failed to read core metadata", e));
    let mut writer = BufWriter::new(io::stderr());

    let lines = [
        ("Name", info.library_name.clone().unwrap_or_else(|| "Unknown".into())),
        ("Version", info.library_version.clone().unwrap_or_default()),
        ("Extensions", info.extensions().collect::<Vec<_>>().join(", ")),
        ("Needs Full Path", info.need_fullpath.to_string()),
        ("Blocks Extraction", info.block_extract.to_string()),
        ("Runs Without Content", info.supports_no_content.to_string()),
    ];
    for (label, value) in lines {
        if writeln!(writer, "{}: {}", label, value).is_err() {
            return;
        }
    }
    let _ = writer.flush();
}

fn print_filters(source: &FilterSource) {
    let registry = FilterRegistry::discover(source, &NativeLoader, cpu::detect())
        .unwrap_or_else(|e| fail("Failed to discover softfilters", e));
    let mut writer = BufWriter::new(io::stderr());
    for filter in registry.iter() {
        let origin = filter
            .path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "built-in".into());
        if writeln!(
            writer,
            "{:<12} {:<20} {:?} ({})",
            filter.short_ident(),
            filter.ident(),
            filter.input_formats(),
            origin
        )
        .is_err()
        {
            return;
        }
    }
    let _ = writer.flush();
}

fn run(matches: &ArgMatches) {
    let mut settings = Settings::with_core(required(matches, "core"));
    settings.content_path = matches.get_one::<String>("content").map(PathBuf::from);
    settings.system_directory = matches.get_one::<String>("system-dir").map(PathBuf::from);
    settings.save_directory = matches.get_one::<String>("save-dir").map(PathBuf::from);
    settings.core_options_path = matches.get_one::<String>("options").map(PathBuf::from);

    let filter_config = matches
        .get_one::<String>("filter-config")
        .map(|path| ConfigFile::from_path(path).unwrap_or_else(|e| fail("Failed to read filter config", e)));
    let source = filter_source(matches);

    let mut session = Session::new(settings, NativeLoader, NullHost);
    if let Err(e) = session.load_core() {
        fail("Failed to load core", e);
    }
    if let Err(e) = session.load_game(None) {
        fail("Failed to load content", e);
    }
    let av_info = session.av_info();
    info!(
        "Running at {:.2} fps, {}x{} (max {}x{})",
        av_info.timing.fps,
        av_info.geometry.base_width,
        av_info.geometry.base_height,
        av_info.geometry.max_width,
        av_info.geometry.max_height
    );

    let outfile = required(matches, "outfile");
    let mut writer = OutputWriter::new(outfile, matches.get_one::<String>("container"))
        .unwrap_or_else(|e| fail("Failed to create output writer", e));

    let total_frames = *matches.get_one::<usize>("frames").unwrap_or(&60);
    let mut progress = ProgressTracker::new(total_frames, matches.get_flag("progress"));
    let mut graph: Option<FilterGraph> = None;

    for n in 0..total_frames {
        session.run_frame();
        match session.take_frame() {
            Some(frame) => {
                let frame = match &filter_config {
                    Some(config) => filter_frame(&mut graph, config, &source, &session, &frame),
                    None => frame,
                };
                if let Err(e) = writer.write_frame(&frame) {
                    fail(&format!("Failed to write frame {}", n), e);
                }
                progress.frame_written();
            }
            None => progress.frame_duped(),
        }
        progress.update(n + 1);

        if session.should_shutdown() {
            warn!("Core requested shutdown after {} frames", n + 1);
            break;
        }
    }

    progress.finish();
    drop(graph);
    session.unload();

    info!("Wrote {} frame(s) to {}", writer.frames_written(), outfile);
    if let Err(e) = writer.finish() {
        fail("Failed to finish output", e);
    }
}

/// Runs `frame` through the configured filter, rebuilding it when the core's pixel format
/// changed.
fn filter_frame(
    graph: &mut Option<FilterGraph>,
    config: &ConfigFile,
    source: &FilterSource,
    session: &Session,
    frame: &VideoFrame,
) -> VideoFrame {
    let input = match frame.format() {
        PixelFormat::Rgb1555 => PixelFormat::Rgb565,
        format => format,
    };
    let stale = graph
        .as_ref()
        .is_none_or(|g| g.input_format() != input.filter_format());
    if stale {
        *graph = None;
        let geometry = session.av_info().geometry;
        let max_width = geometry.max_width.max(frame.width());
        let max_height = geometry.max_height.max(frame.height());
        match FilterGraph::build(config, source, &NativeLoader, input, max_width, max_height) {
            Ok(built) => *graph = Some(built),
            Err(e) => fail("Failed to build softfilter", e),
        }
    }
    match graph.as_mut().map(|g| g.process_frame(frame)) {
        Some(Ok(filtered)) => filtered,
        Some(Err(e)) => fail("Failed to filter frame", e),
        None => frame.clone(),
    }
}
