use clap::Parser;
use color_print::{cformat, cprintln};

use pasm::Assembler;

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(version, about = "Two-pass 6502 assembler", help_template = HELP_TEMPLATE)]
struct Args {
    /// Input file
    #[clap(default_value = "main.s")]
    input: String,

    /// Output file
    #[clap(short, long, default_value = "a.bin")]
    output: String,

    /// Dump resolved symbols and the image
    #[clap(short, long)]
    dump: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let src = std::fs::read_to_string(&args.input)
        .expect(&cformat!("<red,bold>Failed to open file</>: {}", args.input));

    let mut asm = Assembler::new();
    let (image, msgs) = asm.assemble(&src);

    for diag in msgs.iter() {
        let raw = src.lines().nth(diag.line - 1).unwrap_or("");
        diag.print(&args.input, raw);
    }
    if !msgs.is_empty() {
        cprintln!(
            "<red,bold>error</>: aborting due to {} previous error(s)",
            msgs.len()
        );
        std::process::exit(1);
    }

    std::fs::write(&args.output, image)
        .expect(&cformat!("<red,bold>Failed to write file</>: {}", args.output));
    println!("  > {} ({} bytes)", args.output, image.len());

    if args.dump {
        dump(&asm);
    }
}

fn dump(asm: &Assembler) {
    cprintln!("<bold>Symbols:</>");
    for (name, location) in asm.labels().iter() {
        cprintln!("  <green>{}</> = $<yellow>{:04X}</>", name, location);
    }
    for (name, text) in asm.macros().iter() {
        cprintln!("  <cyan>{}</> = \"{}\"", name, text);
    }
    let base = asm.image_base().unwrap_or_default() as usize;
    cprintln!("<bold>Image:</>");
    for (row, chunk) in asm.image().chunks(16).enumerate() {
        let bytes = chunk
            .iter()
            .map(|b| format!("{:02X}", b))
            .collect::<Vec<_>>()
            .join(" ");
        cprintln!("  <green>{:04X}</> | {}", base + row * 16, bytes);
    }
}
