//! Built-in actions: `keep`, `discard`, `fileinto`, `reject`, `redirect`
//! and `stop`.

use core_types::{DataType, Invocation, Registry, SieveResult};

/// Registers the built-in actions.
pub fn register(registry: &mut Registry) -> SieveResult<()> {
    registry.register_action("keep", keep, vec![], vec![], vec![])?;
    registry.register_action("discard", discard, vec![], vec![], vec![])?;
    registry.register_action("fileinto", fileinto, vec![DataType::String], vec![], vec![])?;
    registry.register_action("reject", reject, vec![DataType::String], vec![], vec![])?;
    registry.register_action("redirect", redirect, vec![DataType::String], vec![], vec![])?;
    registry.register_action("stop", stop, vec![], vec![], vec![])?;
    Ok(())
}

fn keep(inv: &mut Invocation<'_>) -> SieveResult<bool> {
    inv.record("keep", "");
    Ok(true)
}

fn discard(inv: &mut Invocation<'_>) -> SieveResult<bool> {
    inv.message_mut().mark_deleted()?;
    inv.record("discard", "marking as deleted");
    Ok(true)
}

fn fileinto(inv: &mut Invocation<'_>) -> SieveResult<bool> {
    let detail = format!("delivering into {}", inv.string(0)?);
    inv.record("fileinto", detail);
    Ok(true)
}

fn reject(inv: &mut Invocation<'_>) -> SieveResult<bool> {
    let detail = inv.string(0)?.to_string();
    inv.record("reject", detail);
    Ok(true)
}

fn redirect(inv: &mut Invocation<'_>) -> SieveResult<bool> {
    let detail = format!("to {}", inv.string(0)?);
    inv.record("redirect", detail);
    Ok(true)
}

fn stop(inv: &mut Invocation<'_>) -> SieveResult<bool> {
    inv.halt();
    Ok(true)
}
