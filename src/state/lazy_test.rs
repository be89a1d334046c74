use super::*;
use std::cell::Cell;

#[derive(Default)]
struct FakeImage {
    src: RefCell<Option<String>>,
    applied: Cell<u32>,
    lazy_class: Cell<bool>,
}

impl FakeImage {
    fn new() -> Rc<Self> {
        let image = Rc::new(Self::default());
        image.lazy_class.set(true);
        image
    }
}

impl LazyTarget for Rc<FakeImage> {
    fn apply_source(&self, src: &str) {
        *self.src.borrow_mut() = Some(src.to_owned());
        self.applied.set(self.applied.get() + 1);
    }

    fn clear_lazy_marker(&self) {
        self.lazy_class.set(false);
    }
}

/// Keeps callbacks so tests decide when an image scrolls into view.
#[derive(Default)]
struct FakeObserver {
    callbacks: Rc<RefCell<Vec<Option<Box<dyn FnMut()>>>>>,
    unsubscribed: Rc<RefCell<Vec<usize>>>,
}

impl FakeObserver {
    fn scroll_into_view(&self, index: usize) {
        let callback = self.callbacks.borrow_mut()[index].take();
        if let Some(mut callback) = callback {
            callback();
            let mut callbacks = self.callbacks.borrow_mut();
            if !self.unsubscribed.borrow().contains(&index) {
                callbacks[index] = Some(callback);
            }
        }
    }

    fn observing(&self) -> usize {
        let unsubscribed = self.unsubscribed.borrow();
        (0..self.callbacks.borrow().len())
            .filter(|index| !unsubscribed.contains(index))
            .count()
    }
}

impl VisibilityObserver<Rc<FakeImage>> for FakeObserver {
    fn observe(&self, _target: &Rc<FakeImage>, on_visible: Box<dyn FnMut()>) -> Subscription {
        let mut callbacks = self.callbacks.borrow_mut();
        let index = callbacks.len();
        callbacks.push(Some(on_visible));
        let unsubscribed = Rc::clone(&self.unsubscribed);
        Subscription::new(move || unsubscribed.borrow_mut().push(index))
    }
}

fn observed(observer: &FakeObserver) -> Option<&dyn VisibilityObserver<Rc<FakeImage>>> {
    Some(observer)
}

fn images(count: usize) -> (Vec<Rc<FakeImage>>, Vec<LazyImage<Rc<FakeImage>>>) {
    let targets: Vec<Rc<FakeImage>> = (0..count).map(|_| FakeImage::new()).collect();
    let lazy = targets
        .iter()
        .enumerate()
        .map(|(index, target)| LazyImage::new(Rc::clone(target), format!("/thumbs/{index}.png")))
        .collect();
    (targets, lazy)
}

#[test]
fn nothing_loads_before_visibility() {
    let (targets, lazy) = images(3);
    let observer = FakeObserver::default();
    let loader = LazyLoader::start(lazy, observed(&observer), LazyFallback::Inert);

    assert_eq!(loader.len(), 3);
    assert_eq!(loader.loaded_count(), 0);
    assert_eq!(loader.observed_count(), 3);
    assert!(targets.iter().all(|image| image.src.borrow().is_none()));
}

#[test]
fn visible_image_loads_once_and_is_unobserved() {
    let (targets, lazy) = images(2);
    let observer = FakeObserver::default();
    let loader = LazyLoader::start(lazy, observed(&observer), LazyFallback::Inert);

    observer.scroll_into_view(1);
    assert!(loader.is_loaded(1));
    assert!(!loader.is_loaded(0));
    assert_eq!(targets[1].src.borrow().as_deref(), Some("/thumbs/1.png"));
    assert!(!targets[1].lazy_class.get());
    assert!(targets[0].lazy_class.get());
    assert_eq!(*observer.unsubscribed.borrow(), vec![1]);
    assert_eq!(loader.observed_count(), 1);
    assert_eq!(observer.observing(), 1);

    observer.scroll_into_view(1);
    assert_eq!(targets[1].applied.get(), 1);
}

#[test]
fn never_visible_image_never_loads() {
    let (targets, lazy) = images(2);
    let observer = FakeObserver::default();
    let loader = LazyLoader::start(lazy, observed(&observer), LazyFallback::Eager);

    observer.scroll_into_view(0);
    assert_eq!(loader.loaded_count(), 1);
    assert!(targets[1].src.borrow().is_none());
}

#[test]
fn missing_observer_inert_leaves_images_deferred() {
    let (targets, lazy) = images(2);
    let loader = LazyLoader::start(lazy, None, LazyFallback::Inert);
    assert_eq!(loader.loaded_count(), 0);
    assert_eq!(loader.observed_count(), 0);
    assert!(targets.iter().all(|image| image.lazy_class.get()));
}

#[test]
fn missing_observer_eager_loads_everything_once() {
    let (targets, lazy) = images(3);
    let loader = LazyLoader::start(lazy, None, LazyFallback::Eager);
    assert_eq!(loader.loaded_count(), 3);
    assert!(targets.iter().all(|image| image.applied.get() == 1));
    assert!(targets.iter().all(|image| !image.lazy_class.get()));
}

#[test]
fn empty_page_is_fine() {
    let observer = FakeObserver::default();
    let loader = LazyLoader::<Rc<FakeImage>>::start(Vec::new(), observed(&observer), LazyFallback::Inert);
    assert!(loader.is_empty());
    assert!(!loader.is_loaded(0));
}

#[test]
fn dropped_loader_ignores_late_visibility() {
    let (targets, lazy) = images(1);
    let observer = FakeObserver::default();
    let loader = LazyLoader::start(lazy, observed(&observer), LazyFallback::Inert);
    drop(loader);
    observer.scroll_into_view(0);
    assert!(targets[0].src.borrow().is_none());
}
