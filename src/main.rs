#![cfg_attr(target_arch = "avr", no_std)]
#![cfg_attr(target_arch = "avr", no_main)]
#![cfg_attr(target_arch = "avr", feature(abi_avr_interrupt))]

#[cfg(target_arch = "avr")]
mod firmware {
    use panic_halt as _;

    use avr_device::atmega324pa::Peripherals;
    use core::cell::RefCell;
    use critical_section::Mutex;
    use frogger_firmware::config::{CONFIG, UART_BAUD};
    use frogger_firmware::countdown::{self, Countdown, CountdownState};
    use frogger_firmware::drivers::{ButtonHandler, LedBar, SerialConsole, SevenSegment};
    use frogger_firmware::game::{GameContext, Playfield, Session, SessionState};
    use frogger_firmware::hal::gpio::{self, ButtonPin, DigitSelectPin, LivesPort, SegmentPort};
    use frogger_firmware::hal::timer::{self, SystemClock};
    use frogger_firmware::hal::uart::{self, UartRx, UartTx};
    use frogger_firmware::input::{ButtonSource, Direction};
    use frogger_firmware::lanes::{LaneId, ScrollDirection};
    use frogger_firmware::logger::{Level, Logger};
    use frogger_firmware::{log_info, log_warn};

    static COUNTDOWN: Mutex<RefCell<CountdownState>> =
        Mutex::new(RefCell::new(CountdownState::new()));

    // Frog, lane and LED-matrix logic from the C game module.
    extern "C" {
        fn initialise_game();
        fn is_frog_dead() -> u8;
        fn frog_has_reached_riverbank() -> u8;
        fn is_riverbank_full() -> u8;
        fn get_level() -> u8;
        fn level_upgrade();
        fn put_frog_in_start_position();
        fn move_frog_forward();
        fn move_frog_backward();
        fn move_frog_to_left();
        fn move_frog_to_right();
        fn scroll_vehicle_lane(lane: u8, direction: i8);
        fn scroll_river_channel(channel: u8, direction: i8);
        fn time_out();
        fn ledmatrix_setup();
    }

    struct Board {
        console: SerialConsole<UartTx>,
        lives: LedBar<LivesPort>,
    }

    impl Playfield for Board {
        fn is_frog_dead(&self) -> bool {
            unsafe { is_frog_dead() != 0 }
        }

        fn frog_reached_far_bank(&self) -> bool {
            unsafe { frog_has_reached_riverbank() != 0 }
        }

        fn riverbank_full(&self) -> bool {
            unsafe { is_riverbank_full() != 0 }
        }

        fn current_level(&self) -> u8 {
            unsafe { get_level() }
        }

        fn move_frog(&mut self, direction: Direction) {
            unsafe {
                match direction {
                    Direction::Up => move_frog_forward(),
                    Direction::Down => move_frog_backward(),
                    Direction::Left => move_frog_to_left(),
                    Direction::Right => move_frog_to_right(),
                }
            }
        }

        fn scroll_lane(&mut self, lane: LaneId, direction: ScrollDirection) {
            let step = match direction {
                ScrollDirection::Left => -1,
                ScrollDirection::Right => 1,
            };
            unsafe {
                match lane {
                    LaneId::Road(n) => scroll_vehicle_lane(n, step),
                    LaneId::River(n) => scroll_river_channel(n, step),
                }
            }
        }

        fn put_frog_in_start_position(&mut self) {
            unsafe { put_frog_in_start_position() }
        }

        fn time_out(&mut self) {
            unsafe { time_out() }
        }

        fn advance_level(&mut self) {
            unsafe { level_upgrade() }
        }

        fn show_lives(&mut self, lives: u8) {
            self.lives.show_lives(lives);
        }

        fn show_level(&mut self, level: u8) {
            self.console.move_cursor(10, 15);
            ufmt::uwrite!(&mut self.console, "Level {}", level).ok();
        }

        fn show_paused(&mut self, paused: bool) {
            if paused {
                self.console.move_cursor(10, 20);
                self.console.write_line("Game Paused!");
            } else {
                self.console.clear_terminal();
            }
        }

        fn show_game_over(&mut self) {
            self.console.move_cursor(10, 14);
            self.console.write_line("GAME OVER");
            self.console.move_cursor(10, 15);
            self.console.write_line("Press a button to start again");
        }
    }

    #[avr_device::entry]
    fn main() -> ! {
        let Some(dp) = Peripherals::take() else {
            loop {}
        };

        gpio::configure(&dp.PORTA, &dp.PORTB, &dp.PORTC, &dp.PORTD);
        uart::init_uart(&dp.USART0);
        timer::init_timer0(&dp.TC0);
        timer::init_timer1(&dp.TC1);
        unsafe {
            ledmatrix_setup();
            // SAFETY: all interrupt-shared state is statically initialised.
            avr_device::interrupt::enable();
        }

        let clock = SystemClock;
        let countdown = Countdown::new(&COUNTDOWN, CONFIG.countdown_start);
        let mut log = Logger::new(SerialConsole::new(UartTx), Level::Info);
        let mut board = Board {
            console: SerialConsole::new(UartTx),
            lives: LedBar::new(LivesPort),
        };
        let mut buttons = ButtonHandler::new(ButtonPin::all());
        let mut serial = UartRx;

        board.console.clear_terminal();
        board.console.move_cursor(10, 10);
        board.console.write_line("Frogger");
        log_info!(&mut log, "terminal at {} baud", UART_BAUD);

        loop {
            unsafe { initialise_game() };
            buttons.clear();
            serial.clear();

            let mut session = Session::new(&CONFIG, clock.now());
            let mut cx = GameContext {
                field: &mut board,
                buttons: &mut buttons,
                serial: &mut serial,
                countdown,
                log: &mut log,
            };
            session.start(clock.now(), &mut cx);
            while session.step(clock.now(), &mut cx) == SessionState::Playing {}

            let overruns = uart::overrun_count();
            if overruns > 0 {
                log_warn!(&mut log, "{} serial bytes dropped", overruns);
            }
            while buttons.button_pushed(clock.now()).is_none() {}
        }
    }

    #[avr_device::interrupt(atmega324pa)]
    fn TIMER1_COMPA() {
        let output = critical_section::with(|cs| countdown::isr_tick(cs, &COUNTDOWN));
        SevenSegment::new(DigitSelectPin, SegmentPort).apply(output).ok();
    }
}

#[cfg(not(target_arch = "avr"))]
fn main() {}
