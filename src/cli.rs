use clap::Parser;

#[derive(Parser)]
#[command(
    name = "xclipmon",
    version,
    about = "Watch the X11 CLIPBOARD selection and show which process owns it",
    long_about = "Watch the X11 CLIPBOARD selection and show which process owns it.\n\n\
                  Output language follows LC_ALL, LC_MESSAGES, then LANG (English or \
                  Chinese). Set RUST_LOG for diagnostics on stderr."
)]
pub struct Cli {}
