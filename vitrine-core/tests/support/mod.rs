#![allow(dead_code)]

use std::sync::Once;
use tracing_subscriber::EnvFilter;
use vitrine_core::mock::{settle, MockElement, MockHost};
use vitrine_core::{Lightbox, Options};

static INIT: Once = Once::new();

pub fn tracing_init() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("vitrine_core=debug"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

pub fn image_path(i: usize) -> String {
    format!("/images/photo-{}.jpg", i)
}

/// `n` anchors on a fresh page, in the default group.
pub fn page_with_anchors(n: usize) -> (MockHost, Vec<MockElement>) {
    let mut host = MockHost::new();
    let triggers = (0..n).map(|i| host.anchor(&image_path(i))).collect();
    (host, triggers)
}

pub struct Fixture {
    pub lightbox: Lightbox<MockHost>,
    pub triggers: Vec<MockElement>,
}

impl Fixture {
    pub fn new(n: usize) -> Self {
        Self::with_options(n, Options::default())
    }

    pub fn with_options(n: usize, options: Options) -> Self {
        tracing_init();
        let (host, triggers) = page_with_anchors(n);
        let mut lightbox = Lightbox::new(host, options).expect("valid options");
        assert_eq!(lightbox.init(), n);
        Self { lightbox, triggers }
    }

    pub fn host(&self) -> &MockHost {
        self.lightbox.host()
    }

    pub fn host_mut(&mut self) -> &mut MockHost {
        self.lightbox.host_mut()
    }

    /// Open on trigger `index` and let its image load.
    pub fn open(&mut self, index: usize) {
        let trigger = self.triggers[index];
        assert!(self.lightbox.open(&trigger));
        self.settle();
    }

    pub fn settle(&mut self) {
        settle(&mut self.lightbox);
    }
}
