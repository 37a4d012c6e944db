use pex::prelude::*;

fn main() -> pex::Result<()> {
    #[cfg(target_os = "linux")]
    let pin = PinConfig::core(0);

    #[cfg(target_os = "macos")]
    let pin = PinConfig {
        core_id: None,
        mac_affinity_tag: Some(1),
    };

    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    let pin = PinConfig::default();

    let config = ContextConfig::from_env()?
        .with_thread_name("pex-pinned")
        .with_pin(pin);
    let context = Context::with_config(config)?;

    let sch = context.scheduler();
    let v = sync_wait(sch.schedule_value(0i64).then(|c| c + 1))?;
    println!("final({}): {v:?}", context.name());
    Ok(())
}
