//! Integer time helpers for the tick-based simulation.
//!
//! The simulation advances in discrete time steps. All durations coming
//! from effect definitions are expressed in milliseconds and converted
//! once into time steps, so per-tick bookkeeping stays pure integer math.

/// Number of simulation time steps per second.
pub const TIME_STEPS_PER_SECOND: i32 = 10;

/// Milliseconds covered by a single time step.
pub const MS_PER_TIME_STEP: i32 = 1000 / TIME_STEPS_PER_SECOND;

/// Sentinel duration meaning "lives forever".
///
/// Used for both millisecond durations and time step counts.
pub const TIME_INFINITE: i32 = -1;

/// Converts milliseconds into time steps, preserving [`TIME_INFINITE`].
pub const fn ms_to_time_steps(time_ms: i32) -> i32 {
    if time_ms == TIME_INFINITE {
        return TIME_INFINITE;
    }

    TIME_STEPS_PER_SECOND * time_ms / 1000
}

/// Converts time steps into milliseconds, preserving [`TIME_INFINITE`].
pub const fn time_steps_to_ms(time_steps: i32) -> i32 {
    if time_steps == TIME_INFINITE {
        return TIME_INFINITE;
    }

    time_steps * MS_PER_TIME_STEP
}
