use pex::BoxSender;
use pex::prelude::*;

fn main() -> pex::Result<()> {
    let context = Context::new()?;
    let sch = context.scheduler();

    for input in [3, 8] {
        let inner = sch.clone();
        let chain = sch
            .schedule_value(input)
            .let_value(move |n: u32| -> BoxSender<String> {
                if n % 2 == 0 {
                    just(format!("{n} is even")).boxed()
                } else {
                    inner
                        .schedule_value(3 * n + 1)
                        .then(move |m: u32| format!("{n} is odd, next {m}"))
                        .boxed()
                }
            });
        println!("{}", sync_wait(chain)?.unwrap_or_default());
    }
    Ok(())
}
