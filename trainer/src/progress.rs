use indicatif::{ProgressBar, ProgressStyle};

pub struct EpochProgressBar {
    bar: ProgressBar,
}

impl EpochProgressBar {
    pub fn new(epoch: usize, epochs: usize, num_steps: usize) -> Self {
        let bar = ProgressBar::new(num_steps as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.cyan} {prefix} {pos}/{len} [{wide_bar:.cyan/blue}] {eta_precise} | {msg}",
                )
                .unwrap(),
        );
        bar.set_prefix(format!("epoch {}/{}", epoch, epochs));

        Self { bar }
    }

    pub fn update(&self, loss: f32) {
        self.bar.set_message(format!("loss: {:.5}", loss));
        self.bar.inc(1);
    }

    pub fn finish(&self, avg_loss: f32) {
        self.bar.set_message(format!("avg loss: {:.5}", avg_loss));
        self.bar.finish();
    }
}
