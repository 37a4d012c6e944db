use pex::prelude::*;

fn main() -> pex::Result<()> {
    let context = Context::new()?;
    let sch = context.scheduler();

    // Each step runs on the context thread, in order.
    let count = then(
        then(then(schedule(&sch), |()| 0), |n: i32| n + 1),
        |n: i32| n + 2,
    );
    println!("count: {:?}", sync_wait(count)?);

    // Errors skip value continuations until something handles them.
    let recovered = sch
        .schedule()
        .then(|()| -> i32 { panic!("bad input") })
        .upon_error(|e| {
            println!("recovering from: {e}");
            -1
        });
    println!("recovered: {:?}", sync_wait(recovered)?);

    // A stopped chain yields no value.
    println!("stopped: {:?}", sync_wait(just_stopped::<i32>())?);
    Ok(())
}
