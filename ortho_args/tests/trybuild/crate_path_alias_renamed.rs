//! Trybuild fixture verifying `#[ortho_args(crate = "...")]` works with a
//! genuine rename via `use ... as`.

use ortho_args as cli_schema;
use cli_schema::{ArgChoice, ArgSchema};

#[derive(Debug, Clone, Copy, ArgChoice)]
#[ortho_args(crate = "cli_schema")]
enum Mode {
    Fast,
    Safe,
}

/// Generated code must reach every runtime item through `cli_schema`.
#[derive(Debug, ArgSchema)]
#[ortho_args(crate = "cli_schema", post_parse_hook)]
struct AliasedArgs {
    #[ortho_args(default = Mode::Safe)]
    mode: Mode,
    tags: Vec<String>,
}

impl cli_schema::PostParseHook for AliasedArgs {
    fn post_parse(&mut self, _ctx: &cli_schema::PostParseContext) -> cli_schema::ArgsResult<()> {
        Ok(())
    }
}

fn main() {
    let result = AliasedArgs::try_parse_from(["--mode", "fast"]);
    let _: cli_schema::ArgsResult<AliasedArgs> = result;
}
