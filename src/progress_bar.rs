use indicatif::{MultiProgress, ProgressBar as InnerProgressBar, ProgressStyle};

/// Batch progress: one tick per settled document.
#[derive(Debug, Clone)]
pub struct ProgressBar {
    inner: InnerProgressBar,
    failed: u64,
}

impl ProgressBar {
    pub fn new(mp: &MultiProgress, prefix: &str, len: usize) -> Self {
        let template = "{prefix:>.bold}\n[{bar:40.cyan/blue}] {pos}/{len}: {msg} ({eta})";

        let inner = mp.add(InnerProgressBar::new(len as u64));

        if let Ok(style) = ProgressStyle::default_bar().template(template) {
            inner.set_style(style.progress_chars("=>"));
        }
        inner.set_prefix(prefix.to_string());

        inner.tick();

        Self { inner, failed: 0 }
    }

    pub fn set_msg(&self, msg: impl Into<String>) {
        self.inner.set_message(msg.into());
    }

    pub fn settled(&mut self, succeeded: bool) {
        if !succeeded {
            self.failed += 1;
            self.inner.set_message(format!("{} failed", self.failed));
        }
        self.inner.inc(1);
    }

    pub fn finish(&self) {
        self.inner.finish_and_clear();
    }
}
