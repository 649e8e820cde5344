//! Trybuild fixture verifying `#[ortho_args(crate = "ortho_args")]` is
//! accepted when it names the real crate.

use ortho_args::ArgSchema;

#[derive(Debug, ArgSchema)]
#[ortho_args(crate = "ortho_args")]
struct CratePathArgs {
    #[ortho_args(default = "hello")]
    value: String,
    #[ortho_args(default = 1)]
    count: u32,
}

fn main() {
    let result = CratePathArgs::try_parse_from(["--count", "2"]);
    let _: ortho_args::ArgsResult<CratePathArgs> = result;
}
