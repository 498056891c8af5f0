//! Capability probe over a list of selectors

use callforge_sdk::{methods, MethodDescriptor};
use clap::Args;

use super::descriptor_from_signature;
use crate::{output::Output, CliError};

/// Arguments of `supports`
#[derive(Debug, Args)]
pub struct SupportsArgs {
    /// Known method name (e.g. "balanceOf") or a full signature
    pub method: String,
    /// Selectors the contract exposes, e.g. 0x70a08231
    #[arg(required = true)]
    pub selectors: Vec<String>,
}

pub fn execute(args: SupportsArgs, json: bool) -> Result<(), CliError> {
    let method = resolve_method(&args.method)?;
    let supported = method.is_supported(&args.selectors[..]);

    Output::new(json)
        .field("method", &method.name)
        .field("selector", &method.selector_hex())
        .field_bool("supported", supported)
        .line(&format!(
            "{} {}",
            method,
            if supported { "is supported" } else { "is not supported" }
        ))
        .print();
    Ok(())
}

fn resolve_method(name_or_signature: &str) -> Result<MethodDescriptor, CliError> {
    if name_or_signature.contains('(') {
        return descriptor_from_signature(name_or_signature);
    }
    methods::by_name(name_or_signature).ok_or_else(|| {
        let known: Vec<_> = methods::all().into_iter().map(|m| m.name).collect();
        CliError::InvalidInput(format!(
            "unknown method {}; known: {}",
            name_or_signature,
            known.join(", ")
        ))
    })
}
