//! Publishing the crate family in configured order

use crate::core::context::ReleaseContext;
use crate::core::error::{LockstepResult, ReleaseError};
use crate::core::tools::ExternalTools;

/// Run the publish command for every crate, in order.
///
/// Stops at the first failing crate; crates after it are never invoked and
/// crates before it stay published. Returns the names of the published crates.
pub fn run_publish(ctx: &ReleaseContext, tools: &dyn ExternalTools, extra_args: &[String]) -> LockstepResult<Vec<String>> {
  let order: Vec<&str> = ctx.crates.iter().map(|c| c.name.as_str()).collect();
  println!("📦 Publishing {} crate(s) in order", ctx.crates.len());
  println!("   Order: {}", order.join(" → "));
  if !extra_args.is_empty() {
    println!("   Args: {}", extra_args.join(" "));
  }
  println!();

  let mut published = Vec::new();
  for (idx, target) in ctx.crates.iter().enumerate() {
    println!("📌 [{}/{}] {}", idx + 1, ctx.crates.len(), target.name);

    let status = tools.publish(&target.dir, extra_args)?;
    if !status.success() {
      return Err(
        ReleaseError::PublishFailed {
          crate_name: target.name.clone(),
          code: status.code(),
          published,
        }
        .into(),
      );
    }

    println!("   ✅ Published {}", target.name);
    published.push(target.name.clone());
  }

  println!();
  println!("🎉 Published {} crate(s)", published.len());
  Ok(published)
}
