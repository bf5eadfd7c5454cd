#![no_std]
#![no_main]

use defmt_rtt as _;
use panic_probe as _;
use rtic::app;

use clock_core::{ClockState, Effects, Event, Render};
use rp_pico::hal::fugit::ExtU32;
use rp_pico::hal::timer::Alarm;

mod error;
mod face;

/// Feeds one event through the clock and queues a render if it asks for one.
fn dispatch(clock: &mut impl rtic::Mutex<T = ClockState>, event: Event) -> Effects {
    let (effects, mode) = clock.lock(|c| (c.handle(event), c.mode()));
    if event.is_button_event() {
        defmt::info!("{} -> {} ({})", event, effects, mode);
    } else {
        defmt::trace!("{} -> {}", event, effects);
    }

    if effects.render != Render::Skip
        && app::update_display::spawn(effects.render == Render::Redraw).is_err()
    {
        defmt::trace!("render already queued");
    }
    effects
}

/// Arms `alarm` to fire after `us` microseconds.
fn rearm(alarm: &mut impl Alarm, us: u32) {
    alarm.clear_interrupt();
    if alarm.schedule(us.micros()).is_err() {
        defmt::warn!("alarm could not be scheduled for {} us", us);
    }
}

#[app(device = rp_pico::hal::pac, peripherals = true, dispatchers = [I2C0_IRQ])]
mod app {
    use super::*;
    use clock_core::matrix::DEVICES;
    use clock_core::{AlarmEdge, ClockConfig, ClockFace, HoldPoller};
    use embedded_hal::digital::v2::{InputPin, OutputPin};
    use max7219::connectors::SpiConnectorSW;
    use max7219::MAX7219;
    use rp_pico::hal::{
        clocks::{init_clocks_and_plls, Clock},
        fugit::RateExtU32,
        gpio::{
            bank0::{Gpio14, Gpio15, Gpio16, Gpio17, Gpio18, Gpio19, Gpio25},
            FunctionSio, FunctionSpi, Interrupt, Pin, PullDown, PullUp, SioInput, SioOutput,
        },
        pac::SPI0,
        sio::Sio,
        spi::{Enabled, Spi},
        timer::{Alarm0, Alarm1, Timer},
        watchdog::Watchdog,
    };

    use crate::error::{fatal, FatalError};
    use crate::face::MatrixFace;

    const CONFIG: ClockConfig = ClockConfig::DEFAULT;
    const XTAL_FREQ_HZ: u32 = 12_000_000;

    type Spi0 = Spi<
        Enabled,
        SPI0,
        (
            Pin<Gpio19, FunctionSpi, PullDown>,
            Pin<Gpio16, FunctionSpi, PullDown>,
            Pin<Gpio18, FunctionSpi, PullDown>,
        ),
    >;
    type CsPin = Pin<Gpio17, FunctionSio<SioOutput>, PullDown>;
    type Face = MatrixFace<SpiConnectorSW<Spi0, CsPin>>;
    type Button<I> = Pin<I, FunctionSio<SioInput>, PullUp>;
    type AlarmLed = Pin<Gpio25, FunctionSio<SioOutput>, PullDown>;

    #[shared]
    struct Shared {
        clock: ClockState,
        advance_button: Button<Gpio15>,
        repeat_alarm: Alarm1,
        hold: HoldPoller,
    }

    #[local]
    struct Local {
        face: Face,
        led: AlarmLed,
        tick_alarm: Alarm0,
        mode_button: Button<Gpio14>,
    }

    #[init]
    fn init(ctx: init::Context) -> (Shared, Local, init::Monotonics) {
        if let Err(err) = CONFIG.validate() {
            fatal(err.into());
        }

        let mut pac = ctx.device;
        let mut watchdog = Watchdog::new(pac.WATCHDOG);
        let sio = Sio::new(pac.SIO);

        let clocks = init_clocks_and_plls(
            XTAL_FREQ_HZ,
            pac.XOSC,
            pac.CLOCKS,
            pac.PLL_SYS,
            pac.PLL_USB,
            &mut pac.RESETS,
            &mut watchdog,
        )
        .unwrap_or_else(|_| fatal(FatalError::Clocks));

        let mut timer = Timer::new(pac.TIMER, &mut pac.RESETS, &clocks);
        let mut tick_alarm = timer.alarm_0().unwrap_or_else(|| fatal(FatalError::Timer));
        if tick_alarm.schedule(CONFIG.tick_period_us.micros()).is_err() {
            fatal(FatalError::Timer);
        }
        tick_alarm.enable_interrupt();

        let mut repeat_alarm = timer.alarm_1().unwrap_or_else(|| fatal(FatalError::Timer));
        repeat_alarm.enable_interrupt();

        let pins = rp_pico::Pins::new(
            pac.IO_BANK0,
            pac.PADS_BANK0,
            sio.gpio_bank0,
            &mut pac.RESETS,
        );

        let led = pins.led.into_push_pull_output();
        let mode_button = pins.gpio14.into_pull_up_input();
        let advance_button = pins.gpio15.into_pull_up_input();
        mode_button.set_interrupt_enabled(Interrupt::EdgeLow, true);
        advance_button.set_interrupt_enabled(Interrupt::EdgeLow, true);

        let mosi = pins.gpio19.into_function::<FunctionSpi>();
        let sck = pins.gpio18.into_function::<FunctionSpi>();
        let miso = pins.gpio16.into_function::<FunctionSpi>();
        let cs = pins.gpio17.into_push_pull_output();

        let spi = Spi::<_, _, _, 8>::new(pac.SPI0, (mosi, miso, sck)).init(
            &mut pac.RESETS,
            clocks.peripheral_clock.freq(),
            2_000_000u32.Hz(),
            &embedded_hal::spi::MODE_0,
        );

        let display = MAX7219::from_spi_cs(DEVICES, spi, cs).unwrap_or_else(|err| fatal(err.into()));
        let face = MatrixFace::new(display, CONFIG.intensity).unwrap_or_else(|err| fatal(err.into()));

        let clock = ClockState::new(&CONFIG);
        defmt::info!("clock started at {}", clock.now());
        update_display::spawn(true).ok();

        (
            Shared {
                clock,
                advance_button,
                repeat_alarm,
                hold: HoldPoller::new(&CONFIG),
            },
            Local {
                face,
                led,
                tick_alarm,
                mode_button,
            },
            init::Monotonics(),
        )
    }

    // 1 Hz tick
    #[task(binds = TIMER_IRQ_0, priority = 1, shared = [clock], local = [tick_alarm, led])]
    fn timer_tick(mut ctx: timer_tick::Context) {
        rearm(ctx.local.tick_alarm, CONFIG.tick_period_us);

        let effects = dispatch(&mut ctx.shared.clock, Event::Tick);
        match effects.alarm {
            AlarmEdge::Rising => {
                defmt::info!("alarm on");
                ctx.local.led.set_high().ok();
            }
            AlarmEdge::Falling => {
                defmt::info!("alarm off");
                ctx.local.led.set_low().ok();
            }
            AlarmEdge::None => {}
        }
    }

    // Both buttons share the bank 0 interrupt
    #[task(binds = IO_IRQ_BANK0, priority = 1, shared = [clock, advance_button, repeat_alarm, hold], local = [mode_button])]
    fn button_press(mut ctx: button_press::Context) {
        let mode_button = ctx.local.mode_button;
        if mode_button.interrupt_status(Interrupt::EdgeLow) {
            mode_button.clear_interrupt(Interrupt::EdgeLow);
            dispatch(&mut ctx.shared.clock, Event::ButtonA);
        }

        let advance_pressed = ctx.shared.advance_button.lock(|b| {
            let pressed = b.interrupt_status(Interrupt::EdgeLow);
            if pressed {
                // Masked until release so bounce cannot re-enter
                b.set_interrupt_enabled(Interrupt::EdgeLow, false);
                b.clear_interrupt(Interrupt::EdgeLow);
            }
            pressed
        });

        if advance_pressed {
            dispatch(&mut ctx.shared.clock, Event::ButtonB);
            let interval = ctx.shared.hold.lock(|h| {
                h.press();
                h.interval_us()
            });
            ctx.shared.repeat_alarm.lock(|a| rearm(a, interval));
        }
    }

    // Samples the advance button every repeat interval until it is released
    #[task(binds = TIMER_IRQ_1, priority = 1, shared = [clock, advance_button, repeat_alarm, hold])]
    fn button_repeat(mut ctx: button_repeat::Context) {
        ctx.shared.repeat_alarm.lock(|a| a.clear_interrupt());

        let held = ctx
            .shared
            .advance_button
            .lock(|b| b.is_low().unwrap_or(false));

        let (event, interval) = ctx.shared.hold.lock(|h| (h.poll(held), h.interval_us()));

        match event {
            Some(Event::ButtonBReleased) => {
                dispatch(&mut ctx.shared.clock, Event::ButtonBReleased);
                ctx.shared.advance_button.lock(|b| {
                    // Drop edges latched while bouncing on release
                    b.clear_interrupt(Interrupt::EdgeLow);
                    b.set_interrupt_enabled(Interrupt::EdgeLow, true);
                });
            }
            Some(event) => {
                dispatch(&mut ctx.shared.clock, event);
                ctx.shared.repeat_alarm.lock(|a| rearm(a, interval));
            }
            // Still inside the hold delay
            None => ctx.shared.repeat_alarm.lock(|a| rearm(a, interval)),
        }
    }

    #[task(shared = [clock], local = [face], capacity = 2)]
    fn update_display(mut ctx: update_display::Context, redraw: bool) {
        let view = ctx.shared.clock.lock(|c| c.view());
        if let Err(err) = ctx.local.face.render(view, redraw) {
            defmt::warn!("display write failed: {}", defmt::Debug2Format(&err));
        }
    }
}
