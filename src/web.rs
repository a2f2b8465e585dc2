//! Browser host: canvas, image loading, requestAnimationFrame and keyboard.
//!
//! The running game lives in a thread-local so the frame callback and the key
//! listeners (all on the single JS thread) can reach it.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::{info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, KeyboardEvent, Window, window,
};

use crate::config::GameConfig;
use crate::error::GameError;
use crate::game_loop::{GameLoop, Platform};
use crate::render::{AssetState, Sprite, Surface, TextStyle};

thread_local! {
    static GAME: RefCell<Option<GameLoop<WebPlatform>>> = const { RefCell::new(None) };
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

// --- Images -------------------------------------------------------------------

struct SpriteImage {
    sprite: Sprite,
    img: HtmlImageElement,
    state: Rc<Cell<AssetState>>,
}

/// Start loading `src`; the returned state flips to Ready or Failed later.
fn load_image(sprite: Sprite, src: &str) -> Result<SpriteImage, GameError> {
    let img = HtmlImageElement::new()?;
    let state = Rc::new(Cell::new(AssetState::Loading));
    {
        let state = state.clone();
        let onload = Closure::wrap(Box::new(move || {
            state.set(AssetState::Ready);
        }) as Box<dyn FnMut()>);
        img.set_onload(Some(onload.as_ref().unchecked_ref()));
        onload.forget();
    }
    {
        let state = state.clone();
        let src_owned = src.to_string();
        let onerror = Closure::wrap(Box::new(move || {
            warn!("failed to load {:?} image from {}", sprite, src_owned);
            state.set(AssetState::Failed);
        }) as Box<dyn FnMut()>);
        img.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        onerror.forget();
    }
    img.set_src(src);
    Ok(SpriteImage { sprite, img, state })
}

// --- Canvas surface -------------------------------------------------------------

pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    images: Vec<SpriteImage>,
}

impl Surface for CanvasSurface {
    fn draw_sprite(&mut self, sprite: Sprite, x: f64, y: f64) -> Result<(), GameError> {
        if let Some(si) = self.images.iter().find(|si| si.sprite == sprite) {
            self.ctx.draw_image_with_html_image_element(&si.img, x, y)?;
        }
        Ok(())
    }

    fn fill_rect(&mut self, color: &str, x: f64, y: f64, w: f64, h: f64) -> Result<(), GameError> {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(x, y, w, h);
        Ok(())
    }

    fn fill_text(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        style: &TextStyle,
    ) -> Result<(), GameError> {
        self.ctx.set_fill_style_str(style.fill);
        self.ctx.set_font(style.font);
        self.ctx.set_text_align(style.align);
        self.ctx.set_text_baseline(style.baseline);
        self.ctx.fill_text(text, x, y)?;
        Ok(())
    }
}

// --- Platform -------------------------------------------------------------------

pub struct WebPlatform {
    window: Window,
    frame: FrameCallback,
    surface: Option<CanvasSurface>,
}

impl WebPlatform {
    pub fn new() -> Result<Self, GameError> {
        let window = window().ok_or(GameError::NoWindow)?;
        let frame: FrameCallback = Rc::new(RefCell::new(None));
        *frame.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
            GAME.with(|cell| {
                if let Some(game) = cell.borrow_mut().as_mut() {
                    game.tick_logged(ts);
                }
            });
        }) as Box<dyn FnMut(f64)>));
        Ok(Self {
            window,
            frame,
            surface: None,
        })
    }

    /// Create the canvas (or reuse one the page already placed) and size it.
    fn canvas(&self, config: &GameConfig) -> Result<HtmlCanvasElement, GameError> {
        let doc = self.window.document().ok_or(GameError::NoDocument)?;
        let existing = doc.get_element_by_id(&config.canvas_id);
        let canvas: HtmlCanvasElement = if let Some(el) = existing {
            el.dyn_into()
                .map_err(|_| GameError::Js(format!("#{} is not a canvas", config.canvas_id)))?
        } else {
            let c: HtmlCanvasElement = doc
                .create_element("canvas")?
                .dyn_into()
                .map_err(|_| GameError::Js("created element is not a canvas".into()))?;
            c.set_id(&config.canvas_id);
            doc.body().ok_or(GameError::NoBody)?.append_child(&c)?;
            c
        };
        canvas.set_width(config.width as u32);
        canvas.set_height(config.height as u32);
        Ok(canvas)
    }
}

impl Platform for WebPlatform {
    type Surface = CanvasSurface;

    fn initialize(&mut self, config: &GameConfig) -> Result<(), GameError> {
        let canvas = self.canvas(config)?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or(GameError::NoContext)?
            .dyn_into()
            .map_err(|_| GameError::NoContext)?;

        let images = vec![
            load_image(Sprite::Background, &config.assets.background)?,
            load_image(Sprite::Player, &config.assets.player)?,
            load_image(Sprite::Target, &config.assets.target)?,
        ];
        self.surface = Some(CanvasSurface { ctx, images });
        info!("canvas {}x{} ready", config.width, config.height);
        Ok(())
    }

    fn asset_state(&self, sprite: Sprite) -> AssetState {
        self.surface
            .as_ref()
            .and_then(|s| s.images.iter().find(|si| si.sprite == sprite))
            .map(|si| si.state.get())
            .unwrap_or_default()
    }

    fn surface(&mut self) -> Result<&mut CanvasSurface, GameError> {
        self.surface.as_mut().ok_or(GameError::NoContext)
    }

    fn schedule_next_frame(&mut self) -> Result<(), GameError> {
        let frame = self.frame.borrow();
        let cb = frame
            .as_ref()
            .ok_or_else(|| GameError::Js("frame callback missing".into()))?;
        self.window.request_animation_frame(cb.as_ref().unchecked_ref())?;
        Ok(())
    }
}

// --- Entry ------------------------------------------------------------------------

fn install_key_listeners(win: &Window) -> Result<(), GameError> {
    {
        let closure = Closure::wrap(Box::new(move |evt: KeyboardEvent| {
            let code = evt.key_code();
            GAME.with(|cell| {
                if let Some(game) = cell.borrow_mut().as_mut() {
                    // keep arrow keys from scrolling the page
                    if game.session().config().keys.is_bound(code) {
                        evt.prevent_default();
                    }
                    if let Err(e) = game.key_down(code) {
                        warn!("keydown {} failed: {}", code, e);
                    }
                }
            });
        }) as Box<dyn FnMut(_)>);
        win.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let closure = Closure::wrap(Box::new(move |evt: KeyboardEvent| {
            let code = evt.key_code();
            GAME.with(|cell| {
                if let Some(game) = cell.borrow_mut().as_mut() {
                    game.key_up(code);
                }
            });
        }) as Box<dyn FnMut(_)>);
        win.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    Ok(())
}

/// Build the browser game and schedule its first frame. A second call while a
/// game is already running is ignored.
pub fn start(config: GameConfig) -> Result<(), GameError> {
    config.validate()?;
    if GAME.with(|cell| cell.borrow().is_some()) {
        warn!("game already running; ignoring start");
        return Ok(());
    }

    let platform = WebPlatform::new()?;
    install_key_listeners(&platform.window)?;
    GAME.with(|cell| cell.replace(Some(GameLoop::new(config, platform))));
    GAME.with(|cell| match cell.borrow_mut().as_mut() {
        Some(game) => game.start(),
        None => Ok(()),
    })
}
