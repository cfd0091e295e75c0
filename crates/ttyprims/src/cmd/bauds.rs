use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_bauds, OutputFormat};

pub fn run(format: OutputFormat) -> CliResult<i32> {
    print_bauds(format);
    Ok(SUCCESS)
}
