use pex::prelude::*;

fn main() -> pex::Result<()> {
    let io = Context::new()?;
    let compute = Context::with_config(ContextConfig::default().with_thread_name("pex-compute"))?;

    let chain = io.scheduler().schedule()
        | pipe::then(|()| vec![1u64; 8])
        | pipe::transfer(&compute.scheduler())
        | pipe::bulk(8, |i: usize, v: &mut Vec<u64>| v[i] *= i as u64)
        | pipe::then(|v: Vec<u64>| v.iter().sum::<u64>());

    println!("sum of 0..8 = {:?}", sync_wait(chain)?);
    Ok(())
}
