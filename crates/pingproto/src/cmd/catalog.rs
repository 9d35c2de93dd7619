use pingproto_messages::CATALOG;

use crate::cmd::CatalogArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_catalog, OutputFormat};

pub fn run(_args: CatalogArgs, format: OutputFormat) -> CliResult<i32> {
    print_catalog(CATALOG, format);
    Ok(SUCCESS)
}
