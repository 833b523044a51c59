//! One-shot hardware peripheral initialization.
//!
//! Configures the LEDC timer and channels, the battery ADC, and the
//! VBUS-sense GPIO using raw ESP-IDF sys calls. Called once from `main()`
//! before the run loop starts.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcInitFailed(i32),
    GpioConfigFailed(i32),
    LedcInitFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc) => write!(f, "ADC1 init failed (rc={rc})"),
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={rc})"),
            Self::LedcInitFailed(rc) => write!(f, "LEDC timer/channel config failed (rc={rc})"),
        }
    }
}

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the run loop; single-threaded.
    unsafe {
        init_adc()?;
        init_vbus_sense()?;
        init_ledc()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: Must be called only from the single-threaded init path or the
/// main-loop ADC read path. No concurrent access is possible because
/// `init_adc()` completes before the run loop starts.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(target_os = "espidf")]
unsafe fn init_adc() -> Result<(), HwInitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::AdcInitFailed(ret));
    }

    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };
    let ret = unsafe {
        adc_oneshot_config_channel(adc1_handle(), pins::VBAT_ADC_CHANNEL as i32, &chan_cfg)
    };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::AdcInitFailed(ret));
    }

    info!("hw_init: ADC1 configured (CH{}=VBAT)", pins::VBAT_ADC_CHANNEL);
    Ok(())
}

/// Raw battery reading scaled to 16 bits full-scale.
///
/// The oneshot driver returns 12-bit samples; left-shifting by 4 puts them
/// on the 0..=65535 scale the voltage conversion expects.
#[cfg(target_os = "espidf")]
pub fn adc1_read_vbat() -> u16 {
    let mut raw: i32 = 0;
    // SAFETY: ADC1_HANDLE is written once during init_adc() before this
    // function is called; single-threaded main-loop access guaranteed.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), pins::VBAT_ADC_CHANNEL as i32, &mut raw) };
    if ret != ESP_OK as i32 {
        return 0;
    }
    (raw.clamp(0, 0x0FFF) as u16) << 4
}

#[cfg(not(target_os = "espidf"))]
pub fn adc1_read_vbat() -> u16 {
    0
}

// ── VBUS sense GPIO ───────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_vbus_sense() -> Result<(), HwInitError> {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::VBUS_SENSE_GPIO,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_ENABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::GpioConfigFailed(ret));
    }
    info!("hw_init: VBUS sense configured (GPIO{})", pins::VBUS_SENSE_GPIO);
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: gpio_get_level is a read-only register access on an
    // already-configured input pin; safe to call from main context.
    (unsafe { gpio_get_level(pin) }) != 0
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(_pin: i32) -> bool {
    false
}

// ── LEDC PWM ──────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_ledc() -> Result<(), HwInitError> {
    // One shared timer: 500 Hz, 16-bit. At 500 Hz the LEDC source clock
    // still has headroom for 16-bit resolution.
    let timer = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: ledc_timer_t_LEDC_TIMER_0,
        duty_resolution: ledc_timer_bit_t_LEDC_TIMER_16_BIT,
        freq_hz: pins::PWM_FREQ_HZ,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    // SAFETY: Called from single main-task context via init_peripherals().
    let ret = unsafe { ledc_timer_config(&timer) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::LedcInitFailed(ret));
    }

    let channels = [
        (pins::LEDC_CH_LIGHT_GREEN, pins::LED_LIGHT_GREEN_GPIO),
        (pins::LEDC_CH_STAR, pins::LED_STAR_GPIO),
        (pins::LEDC_CH_RED, pins::LED_RED_GPIO),
        (pins::LEDC_CH_GREEN, pins::LED_GREEN_GPIO),
    ];
    for (channel, gpio) in channels {
        let cfg = ledc_channel_config_t {
            speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
            channel,
            timer_sel: ledc_timer_t_LEDC_TIMER_0,
            gpio_num: gpio,
            duty: 0,
            hpoint: 0,
            ..Default::default()
        };
        let ret = unsafe { ledc_channel_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::LedcInitFailed(ret));
        }
    }

    info!("hw_init: LEDC configured ({} Hz, 16-bit, 4 channels)", pins::PWM_FREQ_HZ);
    Ok(())
}

/// Update one LEDC channel's duty. Lossy on error: a failed duty write is
/// invisible for at most one frame, the next render overwrites it.
#[cfg(target_os = "espidf")]
pub fn ledc_set(channel: u32, duty: u16) {
    // SAFETY: Channel was configured during init_ledc(); main-loop only.
    unsafe {
        ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel, u32::from(duty));
        ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn ledc_set(_channel: u32, _duty: u16) {}
