//! Bluetooth module
//!
//! Connectable peripheral exposing the battery level and accepting the
//! current time from the phone.

// Core
use core::mem;

// BLE
use nrf_softdevice::{
    self,
    ble::{
        advertisement_builder::{
            Flag, LegacyAdvertisementBuilder, LegacyAdvertisementPayload, ServiceList, ServiceUuid16,
        },
        gatt_server, peripheral, Connection,
    },
    raw, Config, Softdevice,
};

// Crate
use crate::{HostEvent, EVENTS};
use analog_watchface::time::TimeReference;

use super::time::TimeManager;

/// Advertised and GAP device name
const DEVICE_NAME: &[u8] = b"PineTime";

pub static ADV_DATA: LegacyAdvertisementPayload = LegacyAdvertisementBuilder::new()
    .flags(&[Flag::GeneralDiscovery, Flag::LE_Only])
    .services_16(ServiceList::Complete, &[ServiceUuid16::BATTERY, ServiceUuid16::CURRENT_TIME])
    .full_name("PineTime")
    .build();

pub static SCAN_DATA: LegacyAdvertisementPayload = LegacyAdvertisementBuilder::new()
    .services_16(ServiceList::Complete, &[ServiceUuid16::BATTERY, ServiceUuid16::CURRENT_TIME])
    .build();

#[nrf_softdevice::gatt_server]
pub struct Server {
    pub bas: BatteryService,
    pub cts: CurrentTimeService,
}

#[nrf_softdevice::gatt_service(uuid = "180f")]
pub struct BatteryService {
    #[characteristic(uuid = "2a19", read, notify)]
    pub battery_level: u8,
}

#[nrf_softdevice::gatt_service(uuid = "1805")]
pub struct CurrentTimeService {
    #[characteristic(uuid = "2a2b", read, write)]
    pub current_time: [u8; 10],
}

pub fn generate_config() -> Config {
    Config {
        clock: Some(raw::nrf_clock_lf_cfg_t {
            source: raw::NRF_CLOCK_LF_SRC_RC as u8,
            rc_ctiv: 16,
            rc_temp_ctiv: 2,
            accuracy: raw::NRF_CLOCK_LF_ACCURACY_500_PPM as u8,
        }),
        conn_gap: Some(raw::ble_gap_conn_cfg_t {
            conn_count: 1,
            event_length: 24,
        }),
        conn_gatt: Some(raw::ble_gatt_conn_cfg_t { att_mtu: 256 }),
        gatts_attr_tab_size: Some(raw::ble_gatts_cfg_attr_tab_size_t {
            attr_tab_size: raw::BLE_GATTS_ATTR_TAB_SIZE_DEFAULT,
        }),
        // S113 is peripheral only
        gap_role_count: Some(raw::ble_gap_cfg_role_count_t {
            adv_set_count: 1,
            periph_role_count: 1,
        }),
        gap_device_name: Some(raw::ble_gap_cfg_device_name_t {
            p_value: DEVICE_NAME.as_ptr() as _,
            current_len: DEVICE_NAME.len() as u16,
            max_len: DEVICE_NAME.len() as u16,
            write_perm: unsafe { mem::zeroed() },
            _bitfield_1: raw::ble_gap_cfg_device_name_t::new_bitfield_1(
                raw::BLE_GATTS_VLOC_STACK as u8,
            ),
        }),
        ..Default::default()
    }
}

/// Handle GATT events until the central disconnects
async fn serve(conn: &Connection, server: &Server) {
    let reason = gatt_server::run(conn, server, |e| match e {
        ServerEvent::Bas(BatteryServiceEvent::BatteryLevelCccdWrite { notifications }) => {
            defmt::info!("Battery notifications: {}", notifications);
        }
        ServerEvent::Cts(CurrentTimeServiceEvent::CurrentTimeWrite(bytes)) => {
            match TimeReference::from_cts_bytes(&bytes, TimeManager::ticks()) {
                Ok(reference) => {
                    if EVENTS.try_send(HostEvent::TimeSync(reference)).is_err() {
                        defmt::warn!("Event queue full, time update dropped");
                    }
                }
                Err(e) => defmt::warn!("Rejected time update: {}", e),
            }
        }
    })
    .await;
    defmt::info!("Disconnected: {:?}", reason);
}

/// Advertise, serve one central at a time and report the link state
pub async fn run(sd: &'static Softdevice, server: &'static Server) -> ! {
    let config = peripheral::Config::default();
    loop {
        let adv = peripheral::ConnectableAdvertisement::ScannableUndirected {
            adv_data: &ADV_DATA,
            scan_data: &SCAN_DATA,
        };
        let conn = match peripheral::advertise_connectable(sd, adv, &config).await {
            Ok(conn) => conn,
            Err(e) => {
                defmt::warn!("Advertising failed: {:?}", e);
                continue;
            }
        };

        defmt::info!("Connected");
        EVENTS.send(HostEvent::Connectivity(true)).await;
        serve(&conn, server).await;
        EVENTS.send(HostEvent::Connectivity(false)).await;
    }
}
